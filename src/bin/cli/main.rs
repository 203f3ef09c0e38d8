use anyhow::{bail, Context, Result};
use attachment_store::{
    Attachment, AttachmentConfig, AttachmentId, AttachmentService, AttachmentStoreBuilder,
    Payload, StorageBackend,
};
use clap::{Parser, Subcommand};
use std::path::Path;
use tokio::io::AsyncWriteExt;
use tokio_util::io::StreamReader;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "attachment-cli")]
#[command(about = "Inspect and manage attachments stored in an S3-compatible backend", long_about = None)]
struct Cli {
    /// Collection owning the attachments
    #[arg(short, long, env = "ATTACHMENTS_COLLECTION", default_value = "attachments")]
    collection: String,

    /// Backend path as <bucket>/<prefix>
    #[arg(long, env = "ATTACHMENTS_BACKEND_PATH")]
    backend_path: String,

    /// S3 endpoint URL
    #[arg(long, env = "ATTACHMENTS_ENDPOINT")]
    endpoint: String,

    /// S3 region
    #[arg(long, env = "ATTACHMENTS_REGION", default_value = "us-east-1")]
    region: String,

    /// S3 access key
    #[arg(long, env = "ATTACHMENTS_ACCESS_KEY")]
    access_key: Option<String>,

    /// S3 secret key
    #[arg(long, env = "ATTACHMENTS_SECRET_KEY")]
    secret_key: Option<String>,

    /// Suffix generated ids with the file extension
    #[arg(long, env = "ATTACHMENTS_APPEND_EXTENSION")]
    append_extension: bool,

    /// Base URL attachments are publicly served from (must end with '/')
    #[arg(long, env = "ATTACHMENTS_PUBLIC_URL")]
    public_url: Option<String>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Upload a file as a new attachment of a document
    Put {
        /// Owning document id
        document: String,
        /// File path to upload
        file: String,
        /// Use this id instead of generating one
        #[arg(long)]
        id: Option<String>,
        /// Content type stored with the object
        #[arg(long)]
        content_type: Option<String>,
    },

    /// Download an attachment
    Get {
        /// Owning document id
        document: String,
        /// Attachment id
        id: String,
        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Delete an attachment
    Delete {
        /// Owning document id
        document: String,
        /// Attachment id
        id: String,
    },

    /// List the attachments of a document
    List {
        /// Owning document id
        document: String,
    },

    /// Delete every attachment of a document
    PurgeDocument {
        /// Owning document id
        document: String,
    },

    /// Delete every attachment of the collection
    Clear {
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

impl Cli {
    fn to_config(&self) -> AttachmentConfig {
        AttachmentConfig::builder()
            .collection(self.collection.clone())
            .backend_path(self.backend_path.clone())
            .backend(StorageBackend::S3 {
                endpoint: self.endpoint.clone(),
                region: self.region.clone(),
                access_key: self.access_key.clone(),
                secret_key: self.secret_key.clone(),
                allow_http: self.endpoint.starts_with("http://"),
            })
            .append_extension(self.append_extension)
            .maybe_public_base_url(self.public_url.clone())
            .build()
    }

    fn init_logging(&self) -> Result<()> {
        let level: tracing::Level = self
            .log_level
            .parse()
            .with_context(|| format!("Invalid log level: {}", self.log_level))?;

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .init();

        Ok(())
    }
}

fn existing(document: &str, id: &str) -> Result<Attachment> {
    let id = AttachmentId::new(id.to_string()).context("Invalid attachment id")?;
    Ok(Attachment::existing(document, id))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.init_logging()?;

    let store = AttachmentStoreBuilder::new(cli.to_config())
        .build()
        .context("Failed to configure attachment store")?;

    match cli.command {
        Commands::Put {
            document,
            file,
            id,
            content_type,
        } => {
            let mut attachment = match id {
                Some(id) => existing(&document, &id)?,
                None => Attachment::new(&document),
            };
            if let Some(extension) = Path::new(&file).extension().and_then(|e| e.to_str()) {
                attachment = attachment.with_extension(extension);
            }
            if let Some(name) = Path::new(&file).file_name().and_then(|n| n.to_str()) {
                attachment = attachment.with_filename(name);
            }
            if let Some(content_type) = content_type {
                attachment = attachment.with_content_type(content_type);
            }

            let handle = tokio::fs::File::open(&file)
                .await
                .with_context(|| format!("Failed to open {}", file))?;
            let attachment = store
                .init(attachment.with_payload(Payload::from_reader(handle)))
                .context("Failed to initialize attachment")?;
            let saved = store.save(attachment).await.context("Upload failed")?;

            info!(path = ?saved.path, "uploaded {}", file);
            println!("{}", serde_json::to_string_pretty(&saved)?);
        }
        Commands::Get {
            document,
            id,
            output,
        } => {
            let attachment = store.init(existing(&document, &id)?)?;
            let stream = store
                .get_read_stream(&attachment)
                .await
                .context("Download failed")?;
            let mut reader = StreamReader::new(stream);

            let copied = match output {
                Some(output) => {
                    let mut file = tokio::fs::File::create(&output)
                        .await
                        .with_context(|| format!("Failed to create {}", output))?;
                    let copied = tokio::io::copy(&mut reader, &mut file).await?;
                    file.flush().await?;
                    copied
                }
                None => {
                    let mut stdout = tokio::io::stdout();
                    let copied = tokio::io::copy(&mut reader, &mut stdout).await?;
                    stdout.flush().await?;
                    copied
                }
            };
            info!(bytes = copied, "downloaded {}/{}", document, id);
        }
        Commands::Delete { document, id } => {
            let attachment = store.init(existing(&document, &id)?)?;
            store.delete(&attachment).await.context("Delete failed")?;
            println!("deleted {}/{}", document, id);
        }
        Commands::List { document } => {
            for info in store.list_in_document(&document).await? {
                println!("{}\t{}", info.key, info.size);
            }
        }
        Commands::PurgeDocument { document } => {
            let deleted = store.delete_all_in_document(&document).await?;
            println!("deleted {} attachment(s) of {}", deleted, document);
        }
        Commands::Clear { yes } => {
            if !yes {
                bail!("Refusing to clear collection '{}' without --yes", cli.collection);
            }
            let deleted = store.clear().await?;
            println!("deleted {} attachment(s) from {}", deleted, cli.collection);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_args() -> Vec<&'static str> {
        vec![
            "attachment-cli",
            "--backend-path",
            "bucket/users",
            "--endpoint",
            "http://localhost:9000",
        ]
    }

    #[test]
    fn test_cli_parsing() {
        let mut args = base_args();
        args.extend(["put", "42", "avatar.png", "--content-type", "image/png"]);
        let cli = Cli::parse_from(args);

        match cli.command {
            Commands::Put {
                document,
                file,
                content_type,
                id,
            } => {
                assert_eq!(document, "42");
                assert_eq!(file, "avatar.png");
                assert_eq!(content_type.as_deref(), Some("image/png"));
                assert!(id.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_config_from_cli() {
        let mut args = base_args();
        args.extend(["--public-url", "https://cdn.example.com/", "list", "42"]);
        let cli = Cli::parse_from(args);

        let config = cli.to_config();
        assert_eq!(config.backend_path, "bucket/users");
        assert_eq!(config.backend.endpoint(), "http://localhost:9000");
        assert_eq!(
            config.public_base_url.as_deref(),
            Some("https://cdn.example.com/")
        );
        assert!(matches!(
            config.backend,
            StorageBackend::S3 {
                allow_http: true,
                ..
            }
        ));
    }
}
