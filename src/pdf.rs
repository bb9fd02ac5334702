use rocket::http::{ContentType, Header};
use rocket::response::{self, Responder, Response};
use rocket::Request;
use std::io::Cursor;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// wkhtmltopdf のエラー
#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("no se pudo ejecutar {cmd}: {source}")]
    Spawn {
        cmd: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error de E/S con el conversor: {0}")]
    Io(#[from] std::io::Error),
    #[error("el conversor terminó con {status}: {stderr}")]
    Failed { status: String, stderr: String },
    #[error("el conversor no devolvió contenido")]
    Empty,
}

/// HTML → PDF 変換 (wkhtmltopdf を stdin/stdout で呼ぶ)。
/// A5・UTF-8・余白 6mm・zoom 1.15。
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    cmd: String,
}

impl PdfRenderer {
    pub fn new(cmd: impl Into<String>) -> Self {
        PdfRenderer { cmd: cmd.into() }
    }

    fn args() -> [&'static str; 16] {
        [
            "--quiet",
            "--encoding",
            "UTF-8",
            "--page-size",
            "A5",
            "--margin-top",
            "6mm",
            "--margin-bottom",
            "6mm",
            "--margin-left",
            "6mm",
            "--margin-right",
            "6mm",
            "--zoom",
            "1.15",
            "-",
        ]
    }

    pub async fn render(&self, html: &str) -> Result<Vec<u8>, PdfError> {
        let mut child = Command::new(&self.cmd)
            .args(Self::args())
            // 入力も出力も標準入出力
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PdfError::Spawn {
                cmd: self.cmd.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(html.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(PdfError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        if output.stdout.is_empty() {
            return Err(PdfError::Empty);
        }
        Ok(output.stdout)
    }
}

/// PDF のダウンロード応答
pub struct PdfDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl PdfDownload {
    /// `SOP_<personal_id>_<fecha>.pdf`
    pub fn for_report(personal_id: &str, fecha: &str, bytes: Vec<u8>) -> Self {
        PdfDownload {
            filename: format!("SOP_{}_{}.pdf", personal_id, fecha),
            bytes,
        }
    }
}

impl<'r> Responder<'r, 'static> for PdfDownload {
    fn respond_to(self, _: &'r Request<'_>) -> response::Result<'static> {
        Response::build()
            .header(ContentType::PDF)
            .header(Header::new(
                "Content-Disposition",
                format!("attachment; filename={}", self.filename),
            ))
            .sized_body(self.bytes.len(), Cursor::new(self.bytes))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_read_stdin() {
        let args = PdfRenderer::args();
        assert_eq!(args.last(), Some(&"-"));
        let zoom = args.iter().position(|a| *a == "--zoom").unwrap();
        assert_eq!(args[zoom + 1], "1.15");
    }

    #[test]
    fn test_report_filename() {
        let d = PdfDownload::for_report("P-01", "2024-06-10", vec![1, 2]);
        assert_eq!(d.filename, "SOP_P-01_2024-06-10.pdf");
    }

    #[rocket::async_test]
    async fn test_missing_binary_is_spawn_error() {
        let r = PdfRenderer::new("definitely-not-a-real-wkhtmltopdf");
        assert!(matches!(r.render("<p>x</p>").await, Err(PdfError::Spawn { .. })));
    }
}
