use anyhow::Result;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;

use super::capture::{encode_file, ImageFile};
use super::render::{render, INVALID_FILE_ALERT};
use super::session::{Session, Ticket};
use crate::errors::{AnalysisError, CaptureError};
use crate::models::AnalysisResult;
use crate::services::AnalysisClient;

const HELP: &str = "💬 사용법:\n   <이미지 경로> - 칼로리 분석\n   reset - 처음으로\n   status - 현재 상태 보기\n   quit - 종료";

type Completion = (Ticket, Result<AnalysisResult, AnalysisError>);

enum Flow {
    Continue,
    Quit,
}

/// Drives one [`Session`] from terminal input.
pub struct Console {
    client: Arc<AnalysisClient>,
    session: Session,
}

impl Console {
    pub fn new(client: Arc<AnalysisClient>) -> Self {
        Self {
            client,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn reset(&mut self) {
        self.session.reset();
    }

    /// Analyze one file to completion and return the rendered panel.
    pub async fn analyze_file(&mut self, file: &ImageFile) -> String {
        let encoded = match encode_file(file).await {
            Ok(encoded) => encoded,
            Err(CaptureError::InvalidInputType { .. }) => return INVALID_FILE_ALERT.to_string(),
            Err(err) => {
                self.session.capture_failed(&err);
                return render(&self.session);
            }
        };

        let ticket = self.session.select_image(encoded.clone());
        let outcome = self.client.analyze(&encoded).await;
        self.session.complete(ticket, outcome);
        render(&self.session)
    }

    /// Interactive loop: one image path or command per line until `quit` or EOF.
    ///
    /// Analyses run on spawned tasks; selecting another image while one is in
    /// flight supersedes it. On EOF the request in flight is awaited first.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Completion>();
        let mut lines = input.lines();

        write_panel(&mut output, &render(&self.session)).await?;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    match line? {
                        Some(line) => {
                            if let Flow::Quit = self.handle_line(&line, &tx, &mut output).await? {
                                return Ok(());
                            }
                        }
                        None => break,
                    }
                }
                Some((ticket, outcome)) = rx.recv() => {
                    if self.session.complete(ticket, outcome) {
                        write_panel(&mut output, &render(&self.session)).await?;
                    }
                }
            }
        }

        drop(tx);
        while self.session.is_loading() {
            let Some((ticket, outcome)) = rx.recv().await else {
                break;
            };
            if self.session.complete(ticket, outcome) {
                write_panel(&mut output, &render(&self.session)).await?;
            }
        }

        Ok(())
    }

    async fn handle_line<W>(
        &mut self,
        line: &str,
        tx: &mpsc::UnboundedSender<Completion>,
        output: &mut W,
    ) -> Result<Flow>
    where
        W: AsyncWrite + Unpin,
    {
        match line.trim() {
            "" => {}
            "quit" | "exit" | "q" => return Ok(Flow::Quit),
            "help" | "?" => write_panel(output, HELP).await?,
            "status" => write_panel(output, &render(&self.session)).await?,
            "reset" | "r" => {
                self.session.reset();
                write_panel(output, &render(&self.session)).await?;
            }
            raw => {
                let file = ImageFile::from_path(unquote(raw));
                match encode_file(&file).await {
                    Ok(encoded) => self.start_analysis(encoded, tx),
                    Err(CaptureError::InvalidInputType { .. }) => {
                        write_panel(output, INVALID_FILE_ALERT).await?;
                        return Ok(Flow::Continue);
                    }
                    Err(err) => self.session.capture_failed(&err),
                }
                write_panel(output, &render(&self.session)).await?;
            }
        }
        Ok(Flow::Continue)
    }

    fn start_analysis(&mut self, encoded: String, tx: &mpsc::UnboundedSender<Completion>) {
        let ticket = self.session.select_image(encoded.clone());
        let client = self.client.clone();
        let tx = tx.clone();

        log::info!("📸 Starting analysis with model {}", client.model_id());
        tokio::spawn(async move {
            let outcome = client.analyze(&encoded).await;
            // Receiver is gone once the console has exited.
            let _ = tx.send((ticket, outcome));
        });
    }
}

/// Paths dropped into a terminal arrive quoted or with escaped spaces.
fn unquote(raw: &str) -> String {
    let trimmed = raw.trim();
    for quote in ['\'', '"'] {
        if let Some(inner) = trimmed
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
        {
            return inner.to_string();
        }
    }
    trimmed.replace("\\ ", " ")
}

async fn write_panel<W>(output: &mut W, panel: &str) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    output.write_all(format!("\n{}\n", panel).as_bytes()).await?;
    output.flush().await?;
    Ok(())
}
