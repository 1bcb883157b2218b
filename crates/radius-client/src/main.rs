use clap::Parser;
use radius_client::{ClientConfig, Context, RadiusClient};
use std::process;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// RADIUS client: resolve servers, connect with failover, load dictionaries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "radius-client")]
struct Cli {
    /// Path to configuration file
    #[arg(value_name = "CONFIG", default_value = "radius-client.json")]
    config_path: String,

    /// Validate configuration and exit (doesn't connect)
    #[arg(short, long)]
    validate: bool,

    /// Log at debug level regardless of the configured level
    #[arg(short, long)]
    debug: bool,

    /// Look up an attribute name in the loaded dictionary
    #[arg(short, long, value_name = "NAME")]
    lookup: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    let context = Context::from_env().with_debug(cli.debug);

    let config = match ClientConfig::from_file(&cli.config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing_subscriber::registry()
                .with(EnvFilter::new(context.log_filter(None)))
                .with(tracing_subscriber::fmt::layer())
                .init();

            if cli.validate {
                eprintln!("{}", context.diagnostic("configuration validation failed"));
                eprintln!("   Error: {}", e);
                process::exit(1);
            }

            warn!("Could not load config file from: {} ({})", cli.config_path, e);
            info!("Creating example configuration at: {}", cli.config_path);

            if let Err(e) = ClientConfig::example().to_file(&cli.config_path) {
                error!("Error creating example config: {}", e);
                process::exit(1);
            }

            info!("Please edit {} and run again", cli.config_path);
            process::exit(0);
        }
    };

    if cli.validate {
        println!("Configuration validated successfully");
        println!();
        println!("Configuration summary:");
        println!("  Transport: {}", config.transport);
        println!("  Default port: {}", config.default_port);
        println!(
            "  Bind: {} / {}",
            config.bind_address_v4, config.bind_address_v6
        );
        match config.connect_timeout_ms {
            Some(ms) => println!("  Connect timeout: {} ms", ms),
            None => println!("  Connect timeout: system default"),
        }
        println!("  Standard dictionary: {}", config.standard_dictionary);
        if let Some(ref path) = config.dictionary_path {
            println!("  Dictionary file: {}", path);
        }
        println!();
        println!("Servers (priority order):");
        for (i, server) in config.servers.iter().enumerate() {
            println!("  {}. {} - {}", i + 1, server.label(), server.addresses.join(", "));
        }
        process::exit(0);
    }

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(context.log_filter(config.log_level()))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("RADIUS client v{}", env!("CARGO_PKG_VERSION"));
    info!("Loaded configuration from: {}", cli.config_path);

    let mut client = match RadiusClient::from_config(context, &config) {
        Ok(client) => client,
        Err(e) => {
            error!("Failed to initialize client: {}", e);
            process::exit(1);
        }
    };

    info!(
        vendors = client.dictionary().vendor_count(),
        attributes = client.dictionary().attribute_count(),
        values = client.dictionary().value_count(),
        "Dictionary ready"
    );

    if let Some(name) = &cli.lookup {
        match client.lookup_attribute(name) {
            Some(attr) => {
                println!("{} = {} ({})", attr.name, attr.id, attr.kind);
                for value in client.dictionary().values_of(&attr.name) {
                    println!("  {} = {}", value.name, value.value);
                }
            }
            None => println!("{}", client.context().diagnostic(format!("unknown attribute {}", name))),
        }
    }

    let result = client.connect();
    for attempt in client.connection().attempts() {
        info!("  {}", attempt);
    }

    match result {
        Ok(()) => {
            if let (Some(cursor), Some(target)) = (
                client.connection().cursor(),
                client.connection().current_target(),
            ) {
                info!(
                    transport = %client.connection().transport(),
                    "Connected to {} ({})",
                    target,
                    cursor
                );
            }
            client.connection_mut().close();
        }
        Err(e) => {
            error!("{}", client.context().diagnostic(&e));
            process::exit(1);
        }
    }
}
