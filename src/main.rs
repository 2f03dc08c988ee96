use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stroke_scan::classifier::OnnxClassifier;
use stroke_scan::client::PredictClient;
use stroke_scan::render::{Report, RUNNING_MESSAGE};
use stroke_scan::routes::{self, AppState};
use stroke_scan::Config;

/// Brain scan stroke screening.
#[derive(Parser, Debug)]
#[command(name = "stroke-scan")]
#[command(version)]
struct Args {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the prediction server.
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(short, long)]
        port: Option<u16>,

        /// ONNX model file.
        #[arg(long, env = "MODEL_PATH")]
        model: Option<PathBuf>,

        #[arg(long)]
        upload_dir: Option<String>,
    },

    /// Submit a scan to a running server and print the diagnosis.
    Submit {
        file: Option<PathBuf>,

        /// Server base URL.
        #[arg(long)]
        url: Option<String>,
    },
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("stroke_scan=debug,info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let mut config = Config::load()?;

    match args.command {
        Command::Serve {
            host,
            port,
            model,
            upload_dir,
        } => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(model) = model {
                config.model_path = model.to_string_lossy().into_owned();
            }
            if let Some(dir) = upload_dir {
                config.upload_dir = dir;
            }
            serve(config).await
        }
        Command::Submit { file, url } => {
            if let Some(url) = url {
                config.predict_url = url;
            }
            submit(config, file).await
        }
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;

    let classifier = OnnxClassifier::load(&config.model_path, config.image_size)?;
    let state = AppState::new(&config, Arc::new(classifier));
    state.store.ensure_dir()?;

    let (host, port) = config.bind_addr();
    info!("Server running at http://{}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(routes::configure)
    })
    .bind((host, port))?
    .run()
    .await?;

    Ok(())
}

async fn submit(config: Config, file: Option<PathBuf>) -> anyhow::Result<()> {
    let client = PredictClient::from_config(&config)?;

    if file.is_some() {
        println!("{}", RUNNING_MESSAGE);
    }

    let response = client.submit(file.as_deref()).await?;
    println!("{}", Report::from_response(&response));
    Ok(())
}
