use rocket::request::{FromRequest, Outcome, Request};
use std::convert::Infallible;

/// `X-Requested-With: XMLHttpRequest` が付いているか。
/// 同じ URL を HTML フォームと fetch の両方から叩く削除系で JSON を返すために使う。
pub struct Ajax(pub bool);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Ajax {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let is_ajax = request
            .headers()
            .get_one("X-Requested-With")
            .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
            .unwrap_or(false);
        Outcome::Success(Ajax(is_ajax))
    }
}
