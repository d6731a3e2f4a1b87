use actix_cors::Cors;
use actix_web::http::{header, uri::Uri};
use log::{info, warn};
use std::{
    env as stdenv,
    fs::File,
    io::{BufRead, BufReader, Error as IOError, ErrorKind},
    path::Path,
};

pub const CORS_FILE: &str = ".env_cors";

pub fn check_env_cors() -> bool {
    let current_dir = stdenv::current_dir().unwrap_or_else(|_| Path::new(".").to_path_buf());
    let env_cors_path = current_dir.join(CORS_FILE);

    if env_cors_path.exists() {
        info!("{} file found at: {}", CORS_FILE, env_cors_path.display());
        true
    } else {
        warn!(
            "{} file not found at: {}, allowing any origin",
            CORS_FILE,
            env_cors_path.display()
        );
        false
    }
}

/// An origin is `scheme://host[:port]` over http or https. Anything else,
/// `*` included, cannot be handed to `Cors::allowed_origin`.
fn parse_origin(line: &str) -> Result<String, String> {
    let uri = line.parse::<Uri>().map_err(|e| e.to_string())?;
    let scheme = match uri.scheme_str() {
        Some(scheme @ ("http" | "https")) => scheme,
        Some(other) => return Err(format!("unsupported scheme {}", other)),
        None => return Err("missing scheme".to_string()),
    };
    let authority = match uri.authority() {
        Some(authority) if !authority.host().is_empty() => authority,
        _ => return Err("missing host".to_string()),
    };
    if uri.path() != "/" || uri.query().is_some() {
        return Err("an origin has no path or query".to_string());
    }
    Ok(format!("{}://{}", scheme, authority))
}

/// Reads one origin per line. Blank lines are skipped, lines that are not
/// an origin are warned about and dropped; if nothing survives the file is
/// rejected.
pub fn load_and_validate_cors_origins(path: &str) -> Result<Vec<String>, IOError> {
    let file = File::open(path)?;
    let buf_reader = BufReader::new(file);
    let mut origins = Vec::new();

    for line in buf_reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match parse_origin(line) {
            Ok(origin) => origins.push(origin),
            Err(e) => warn!("Invalid origin {:?} in CORS configuration: {}", line, e),
        }
    }

    if origins.is_empty() {
        return Err(IOError::new(
            ErrorKind::InvalidData,
            "All CORS lines failed validation.",
        ));
    }

    Ok(origins)
}

pub fn build_cors(origins: &[String]) -> Cors {
    if origins.is_empty() {
        return Cors::permissive();
    }
    let cors = Cors::default()
        .allowed_methods(vec!["GET", "POST", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::ACCEPT, header::CONTENT_TYPE])
        .max_age(3600);
    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
