use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::{json, Value};
use sniff_ingest::{
    ClientConfig, CompanyInfo, DetectionRequest, DetectorClient, ImageUpload, Scanner,
    SocialMedia,
};
use sniff_normalize::{normalize, CanonicalResult, Detector};
use sniff_session::{FileSessionStore, Session, User};

use crate::cli::{Command, EcommerceArgs, ImageArgs, JobArgs, NewsArgs, SessionCommand};

pub async fn run(command: Command, show_raw: bool) -> anyhow::Result<String> {
    match command {
        Command::Normalize(args) => {
            let detector = Detector::parse(&args.detector)
                .with_context(|| format!("unknown detector: {}", args.detector))?;
            let raw = read_payload(&args.file)?;
            let result = normalize(detector, &raw);
            render(&raw, &result, show_raw)
        }
        Command::Session(command) => session_command(command),
        scan_command => {
            let request = build_request(scan_command)?;
            let client = DetectorClient::new(ClientConfig::from_env()?)
                .context("failed to create detector client")?;
            let scanner = Scanner::new(Arc::new(client));

            let session = Session::restore(&FileSessionStore::from_env());
            if let Some(user) = &session.user {
                tracing::debug!(user_id = %user.id, "scanning as logged-in user");
            }

            let outcome = scanner.scan(&request).await?;
            render(&outcome.raw, &outcome.result, show_raw)
        }
    }
}

fn build_request(command: Command) -> anyhow::Result<DetectionRequest> {
    let request = match command {
        Command::News(NewsArgs { query, statement }) => match (query, statement) {
            (Some(query), _) => DetectionRequest::NewsQuery { query },
            (None, Some(statement)) => DetectionRequest::NewsStatement { statement },
            (None, None) => bail!("either --query or --statement is required"),
        },
        Command::Ecommerce(EcommerceArgs { url, name }) => match name {
            Some(name) => DetectionRequest::EcommerceProduct { name, url },
            None => DetectionRequest::EcommerceUrl { url },
        },
        Command::Job(args) => DetectionRequest::JobPosting(company_info(args)?),
        Command::Image(args) => DetectionRequest::Image(image_upload(&args)?),
        Command::Normalize(_) | Command::Session(_) => bail!("not a scan command"),
    };
    Ok(request)
}

fn company_info(args: JobArgs) -> anyhow::Result<CompanyInfo> {
    let mut company = match &args.file {
        Some(path) => {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str::<CompanyInfo>(&contents)
                .with_context(|| format!("invalid company info in {}", path.display()))?
        }
        None => CompanyInfo::default(),
    };

    if let Some(name) = args.name {
        company.name = name;
    }
    company.website = args.website.or(company.website);
    company.email = args.email.or(company.email);
    company.phone = args.phone.or(company.phone);
    company.job_description = args.description.or(company.job_description);
    company.salary_offered = args.salary.or(company.salary_offered);
    if let Some(linkedin) = args.linkedin {
        company
            .social_media
            .get_or_insert_with(SocialMedia::default)
            .linkedin = Some(linkedin);
    }
    Ok(company)
}

fn image_upload(args: &ImageArgs) -> anyhow::Result<ImageUpload> {
    let bytes = std::fs::read(&args.path)
        .with_context(|| format!("failed to read {}", args.path.display()))?;
    let file_name = args
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = args
        .content_type
        .clone()
        .unwrap_or_else(|| guess_content_type(&args.path).to_string());

    Ok(ImageUpload {
        file_name,
        content_type,
        bytes,
    })
}

fn guess_content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        Some("tif" | "tiff") => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Reads a saved payload. Text that is not JSON is kept as a string.
fn read_payload(path: &Path) -> anyhow::Result<Value> {
    let contents = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok(serde_json::from_str(&contents).unwrap_or(Value::String(contents)))
}

fn render(raw: &Value, result: &CanonicalResult, show_raw: bool) -> anyhow::Result<String> {
    let output = if show_raw {
        serde_json::to_string_pretty(&json!({ "raw": raw, "result": result }))?
    } else {
        serde_json::to_string_pretty(result)?
    };
    Ok(output)
}

fn session_command(command: SessionCommand) -> anyhow::Result<String> {
    let store = FileSessionStore::from_env();
    let mut session = Session::restore(&store);

    match command {
        SessionCommand::Login { email, name } => {
            let user = User::with_email(name, email)?;
            session.login(user, &store)?;
            Ok(format!(
                "Logged in. Session saved to {}",
                store.path().display()
            ))
        }
        SessionCommand::Show => match &session.user {
            Some(user) => Ok(serde_json::to_string_pretty(user)?),
            None => Ok("Not logged in".to_string()),
        },
        SessionCommand::Logout => {
            session.clear(&store)?;
            Ok("Logged out".to_string())
        }
    }
}
