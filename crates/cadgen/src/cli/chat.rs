//! Interactive chat over stdin/stdout

use std::path::Path;

use cadgen_application::use_cases::AssistantResponse;
use cadgen_domain::entities::GeneratedArtifact;
use cadgen_domain::error::{Error, Result};
use cadgen_infrastructure::di::AppContext;
use cadgen_infrastructure::error_ext::ErrorContext;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::render::format_response;

const PROMPT: &str = "you> ";

pub(super) async fn run(context: &AppContext, save_dir: Option<&Path>) -> Result<()> {
    let sessions = context.sessions();
    let id = sessions.start();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("Describe the object you want to build. Say 'bye' to leave.");
    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            sessions.end(id);
            break;
        };
        let utterance = line.trim();
        if utterance.is_empty() {
            continue;
        }

        let cancel = CancellationToken::new();
        let turn = sessions.advance(id, utterance, &cancel);
        tokio::pin!(turn);
        let result = tokio::select! {
            result = &mut turn => result,
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                turn.await
            }
        };

        match result {
            Ok(response) => {
                println!("{}", format_response(&response));
                if let (Some(dir), AssistantResponse::Artifact { artifact, .. }) =
                    (save_dir, &response)
                {
                    let path = save_artifact(dir, artifact).await?;
                    println!("(saved to {})", path.display());
                }
            }
            Err(Error::Cancelled) => println!("(cancelled, nothing changed)"),
            Err(e) if e.is_retryable() => {
                warn!(error = %e, "Turn failed");
                println!("Something went wrong: {e}. Please try again.");
            }
            Err(e) => return Err(e),
        }

        if sessions.session(id).await.is_none() {
            break;
        }
    }
    Ok(())
}

async fn save_artifact(dir: &Path, artifact: &GeneratedArtifact) -> Result<std::path::PathBuf> {
    tokio::fs::create_dir_all(dir)
        .await
        .io_context(format!("Failed to create {}", dir.display()))?;
    let stem = artifact.reference_name.as_deref().unwrap_or("design");
    let short_id: String = artifact.id.simple().to_string().chars().take(8).collect();
    let path = dir.join(format!("{stem}_{short_id}.py"));
    tokio::fs::write(&path, &artifact.script_text)
        .await
        .io_context(format!("Failed to write {}", path.display()))?;
    Ok(path)
}
