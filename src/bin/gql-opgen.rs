//! generate graphql operation documents from a schema
//!
//! fetches (or reads) a schema, then writes `<field>.graphql` for every
//! query, mutation, and subscription root field.
//!
//! command help reference (kept in sync with `gql-opgen --help`):
#[doc = concat!("```text\n", include_str!("gql-opgen-help.txt"), "\n```")]
pub const CLI_HELP: &str = include_str!("gql-opgen-help.txt");

use gql_opgen::{
    load_schema_file, FetchMethod, Generator, GeneratorConfig, SchemaFetcher, TypeCatalog,
    DEFAULT_MAX_DEPTH, SCHEMA_URL_ENV,
};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, PartialEq)]
struct Args {
    url: Option<String>,
    token: Option<String>,
    schema_path: Option<PathBuf>,
    out_dir: Option<PathBuf>,
    post: bool,
    max_depth: usize,
    list: bool,
    log: Option<String>,
}

#[derive(Debug, PartialEq)]
enum ParseArgsError {
    Help,
    Message(String),
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = match parse_args(std::env::args().collect(), std::env::var(SCHEMA_URL_ENV).ok()) {
        Ok(args) => args,
        Err(ParseArgsError::Help) => {
            print!("{CLI_HELP}");
            return;
        }
        Err(ParseArgsError::Message(err)) => {
            eprintln!("{err}\n\n{CLI_HELP}");
            std::process::exit(1);
        }
    };

    init_tracing(args.log.as_deref());

    let catalog = match load_catalog(&args).await {
        Ok(catalog) => catalog,
        Err(err) => {
            error!("failed to load schema: {err}");
            if err.is_auth_error() {
                error!("the schema endpoint rejected the request; check --token");
            }
            std::process::exit(1);
        }
    };

    let generator = Generator::new(&catalog).with_max_depth(args.max_depth);

    if args.list {
        for signature in generator.signatures() {
            println!("{signature}");
        }
        return;
    }

    let Some(out_dir) = &args.out_dir else {
        error!("--out is required");
        std::process::exit(1);
    };

    match generator.generate(out_dir) {
        Ok(written) => info!("wrote {} documents to {}", written.len(), out_dir.display()),
        Err(err) => {
            error!("codegen failed: {err}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(filter: Option<&str>) {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
    let filter = match filter {
        Some(filter) => builder.parse_lossy(filter),
        None => builder.from_env_lossy(),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn parse_args(args: Vec<String>, env_url: Option<String>) -> Result<Args, ParseArgsError> {
    let mut url = None;
    let mut token = None;
    let mut schema_path = None;
    let mut out_dir = None;
    let mut post = false;
    let mut max_depth = DEFAULT_MAX_DEPTH;
    let mut list = false;
    let mut log = None;

    let mut iter = args.into_iter().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--url" => url = iter.next(),
            "--token" => token = iter.next(),
            "--schema" => schema_path = iter.next().map(PathBuf::from),
            "--out" => out_dir = iter.next().map(PathBuf::from),
            "--post" => post = true,
            "--max-depth" => {
                let value = iter.next().unwrap_or_default();
                max_depth = value.parse().map_err(|_| {
                    ParseArgsError::Message(format!("invalid --max-depth: {value:?}"))
                })?;
            }
            "--list" => list = true,
            "--log" => log = iter.next(),
            "--help" | "-h" => return Err(ParseArgsError::Help),
            _ => return Err(ParseArgsError::Message(format!("unknown argument: {arg}"))),
        }
    }

    if out_dir.is_none() && !list {
        return Err(ParseArgsError::Message("--out is required".to_string()));
    }

    let url = url.or(env_url);
    if url.is_none() && schema_path.is_none() {
        return Err(ParseArgsError::Message(
            "--url or --schema is required".to_string(),
        ));
    }

    Ok(Args {
        url,
        token,
        schema_path,
        out_dir,
        post,
        max_depth,
        list,
        log,
    })
}

async fn load_catalog(args: &Args) -> gql_opgen::Result<TypeCatalog> {
    if let Some(schema_path) = &args.schema_path {
        return load_schema_file(schema_path);
    }

    let url = args.url.as_deref().unwrap_or_default();
    let mut config = GeneratorConfig::new(url);
    if let Some(token) = &args.token {
        config = config.with_token(token.clone());
    }
    if args.post {
        config = config.with_method(FetchMethod::Post);
    }

    SchemaFetcher::new(config)?.fetch().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        std::iter::once("gql-opgen")
            .chain(args.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_url() {
        let args = parse_args(
            argv(&["--url", "https://api.example.com/graphql", "--out", "ops", "--post"]),
            None,
        )
        .unwrap();
        assert_eq!(args.url.as_deref(), Some("https://api.example.com/graphql"));
        assert_eq!(args.out_dir, Some(PathBuf::from("ops")));
        assert!(args.post);
        assert_eq!(args.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_parse_args_env_url() {
        let args = parse_args(argv(&["--out", "ops"]), Some("http://env/schema.json".to_string()))
            .unwrap();
        assert_eq!(args.url.as_deref(), Some("http://env/schema.json"));
    }

    #[test]
    fn test_parse_args_list_without_out() {
        let args = parse_args(argv(&["--schema", "schema.graphql", "--list"]), None).unwrap();
        assert!(args.list);
        assert!(args.out_dir.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert_eq!(parse_args(argv(&["-h"]), None), Err(ParseArgsError::Help));
        assert!(matches!(
            parse_args(argv(&["--schema", "s.json"]), None),
            Err(ParseArgsError::Message(msg)) if msg.contains("--out")
        ));
        assert!(matches!(
            parse_args(argv(&["--out", "ops"]), None),
            Err(ParseArgsError::Message(msg)) if msg.contains("--url")
        ));
        assert!(matches!(
            parse_args(argv(&["--out", "ops", "--schema", "s.json", "--max-depth", "deep"]), None),
            Err(ParseArgsError::Message(msg)) if msg.contains("--max-depth")
        ));
        assert!(matches!(
            parse_args(argv(&["--bogus"]), None),
            Err(ParseArgsError::Message(msg)) if msg.contains("--bogus")
        ));
    }
}
