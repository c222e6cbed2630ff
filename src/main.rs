#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_cors::Cors;
use actix_web::{http::header, middleware::Logger, web, App, HttpServer};
use authgate::{
    handlers, providers::ProviderRegistry, session::SessionCodec, session::SessionGate,
    settings::AuthgateSettings,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables.
    // This also loads .env and initializes the logger.
    let settings = AuthgateSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e}")))?;

    let registry = ProviderRegistry::from_settings(&settings)
        .map_err(|e| std::io::Error::other(format!("Failed to build provider registry: {e}")))?;
    let codec = SessionCodec::new(&settings.session.secret);
    let gate = SessionGate::new(codec.clone());

    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    let cors_origin = settings.application.cors_origin.clone();
    let settings = web::Data::new(settings);
    let registry = web::Data::new(registry);
    let codec = web::Data::new(codec);
    let gate = web::Data::new(gate);

    HttpServer::new(move || {
        // Credentialed browser clients come from exactly one configured origin.
        let cors = Cors::default()
            .allowed_origin(&cors_origin)
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            .app_data(settings.clone())
            .app_data(registry.clone())
            .app_data(codec.clone())
            .app_data(gate.clone())
            .wrap(cors)
            .wrap(Logger::default())
            .configure(handlers::configure)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &AuthgateSettings) {
    println!("Starting authgate login backend on http://{bind_address}");
    println!();
    println!("Auth endpoints:");
    println!("  POST /auth/google  - Exchange a Google authorization code");
    println!("  POST /auth/github  - Exchange a GitHub authorization code");
    println!("  POST /auth/demo    - Demo login without provider credentials");
    println!("  GET  /auth/status  - Session state (never errors)");
    println!("  GET  /auth/me      - Authenticated identity (401 when anonymous)");
    println!("  POST /auth/logout  - Clear the session cookie");
    println!();
    println!("System endpoints:");
    println!("  GET  /health       - Health check");
    println!();
    println!(
        "CORS origin: {} (credentials allowed)",
        settings.application.cors_origin
    );
    if !settings.application.production {
        println!("Running in development mode; session cookies are not marked Secure");
    }
}
