use rocket::serde::json::serde_json;
use rocket_dyn_templates::context;
use sea_orm::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::views::app_template::AppTemplate;

/// フィルタ定義構造体
#[derive(Serialize, Clone)]
pub struct AdminFilter {
    pub label: String,
    pub parameter_name: String,
    pub choices: Vec<(String, String)>, // (value, label)
}

/// 一覧の列定義 (カラム名, 見出し)
pub type ListColumn = (&'static str, &'static str);

/// 汎用的な一覧表示ビューのためのトレイト。
/// Djangoの `ListView` に相当します。
#[rocket::async_trait]
pub trait ListView<E>
where
    E: EntityTrait,
    E::Model: Serialize + Sync + Send,
{
    /// 使用するテンプレート名 (例: "admin/catalogo_list")
    fn template_name(&self) -> &'static str;

    /// 1ページあたりの表示件数 (Django: paginate_by)
    fn per_page(&self) -> usize {
        25
    }

    /// 一覧に出す列
    fn columns(&self) -> Vec<ListColumn> {
        Vec::new()
    }

    /// 並び替え指定が無いときの列
    fn default_sort(&self) -> &'static str;

    /// ベースとなるクエリを取得 (Django: get_queryset)
    fn get_queryset(&self) -> Select<E> {
        E::find()
    }

    /// コンテキストに追加データを注入する (Django: get_context_data)
    fn get_context_data(&self) -> serde_json::Value {
        serde_json::json!({})
    }

    /// フィルタ定義を取得する
    fn get_filters(&self) -> Vec<AdminFilter> {
        Vec::new()
    }

    /// 検索フィルタを適用する hooks
    fn filter_queryset(&self, query: Select<E>, _q: &str) -> Select<E> {
        query
    }

    /// フィルタパラメータを適用する hooks
    fn apply_filters(&self, query: Select<E>, _params: &HashMap<String, String>) -> Select<E> {
        query
    }

    /// ソート処理を適用する。未知の列名は既定列にフォールバック。
    fn apply_sorting(
        &self,
        query: Select<E>,
        sort: Option<String>,
        dir: Option<String>,
    ) -> (Select<E>, String, String) {
        let direction = dir
            .filter(|d| d.eq_ignore_ascii_case("desc"))
            .map(|_| "desc".to_string())
            .unwrap_or_else(|| "asc".to_string());
        let order = if direction == "desc" { Order::Desc } else { Order::Asc };

        let requested = sort.unwrap_or_else(|| self.default_sort().to_string());
        let column = E::Column::iter()
            .find(|c| c.as_str() == requested)
            .or_else(|| E::Column::iter().find(|c| c.as_str() == self.default_sort()));

        match column {
            Some(col) => (query.order_by(col, order), col.as_str().to_string(), direction),
            None => (query, requested, direction),
        }
    }

    /// リスト表示のメイン処理
    #[allow(clippy::too_many_arguments)]
    async fn list(
        &self,
        db: &DatabaseConnection,
        page: usize,
        q: Option<String>,
        sort: Option<String>,
        dir: Option<String>,
        filters: &HashMap<String, String>,
        extra_context: serde_json::Value,
    ) -> Result<AppTemplate, DbErr> {
        let page = page.max(1);
        let per_page = self.per_page() as u64;

        // 1. クエリ構築
        let mut query = self.get_queryset();

        // 2. 検索適用
        let search_query = q.unwrap_or_default();
        if !search_query.trim().is_empty() {
            query = self.filter_queryset(query, search_query.trim());
        }

        // 3. フィルタ適用
        query = self.apply_filters(query, filters);

        // 4. ソート適用
        let (query, current_sort, current_dir) = self.apply_sorting(query, sort, dir);

        // 5. ページネーション
        let paginator = query.paginate(db, per_page);
        let num_pages = paginator.num_pages().await?;
        let items = paginator.fetch_page((page - 1) as u64).await?;

        let active_filters: Vec<serde_json::Value> = self
            .get_filters()
            .into_iter()
            .map(|f| {
                let current = filters.get(&f.parameter_name).cloned().unwrap_or_default();
                serde_json::json!({
                    "label": f.label,
                    "parameter_name": f.parameter_name,
                    "choices": f.choices,
                    "current_value": current,
                })
            })
            .collect();

        let columns: Vec<serde_json::Value> = self
            .columns()
            .into_iter()
            .map(|(name, label)| serde_json::json!({ "name": name, "label": label }))
            .collect();

        // 6. コンテキスト構築
        let base_context = context! {
            items: items,
            columns: columns,
            current_page: page,
            num_pages: num_pages,
            search_query: search_query,
            sort: current_sort,
            dir: current_dir,
            admin_filters: active_filters,
        };

        let mut context_value = serde_json::to_value(base_context).unwrap_or(serde_json::json!({}));
        if let serde_json::Value::Object(ref mut map) = context_value {
            for extra in [self.get_context_data(), extra_context] {
                if let serde_json::Value::Object(extra) = extra {
                    map.extend(extra);
                }
            }
        }

        Ok(AppTemplate::new(self.template_name(), context_value))
    }
}
