use poem::{listener::TcpListener, middleware::Cors, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;

use venturelink_backend::api::{
    AdminApi, AuthApi, ConnectionsApi, HealthApi, IdeasApi, MatchingApi,
};
use venturelink_backend::app_data::AppData;
use venturelink_backend::config::{init_database, init_logging, run_migrations, Settings};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    // Fail fast: a production boot with missing configuration stops here
    let settings = Settings::from_env().expect("Failed to load settings");
    let production = settings.environment.is_production();

    // Connect to database and run migrations
    let db = init_database(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Connected to database");

    run_migrations(&db)
        .await
        .expect("Failed to run migrations");
    tracing::info!("Database migrations completed");

    let app_data = AppData::init(settings, db)
        .await
        .expect("Failed to initialize application state");

    let auth_api = AuthApi::new(
        app_data.user_store.clone(),
        app_data.token_guard.clone(),
        app_data.token_service.clone(),
        app_data.audit_store.clone(),
    );
    let ideas_api = IdeasApi::new(
        app_data.idea_store.clone(),
        app_data.token_guard.clone(),
        app_data.authorization_guard.clone(),
        app_data.assist.clone(),
    );
    let matching_api = MatchingApi::new(
        app_data.preference_store.clone(),
        app_data.idea_store.clone(),
        app_data.token_guard.clone(),
        app_data.authorization_guard.clone(),
        app_data.match_weights.clone(),
    );
    let connections_api = ConnectionsApi::new(
        app_data.connection_store.clone(),
        app_data.idea_store.clone(),
        app_data.token_guard.clone(),
        app_data.authorization_guard.clone(),
    );
    let admin_api = AdminApi::new(
        app_data.user_store.clone(),
        app_data.token_guard.clone(),
        app_data.authorization_guard.clone(),
        app_data.audit_store.clone(),
    );

    // Create OpenAPI service with every API implementation
    let api_service = OpenApiService::new(
        (
            HealthApi,
            auth_api,
            ideas_api,
            matching_api,
            connections_api,
            admin_api,
        ),
        "VentureLink API",
        env!("CARGO_PKG_VERSION"),
    )
    .server("/api/v1");
    let ui = api_service.swagger_ui();

    // Compose routes: API under /api/v1, Swagger UI outside production
    let mut app = Route::new().nest("/api/v1", api_service);
    if !production {
        app = app.nest("/swagger", ui);
        tracing::info!("Swagger UI mounted at /swagger");
    }

    // Lock CORS down to the configured origins; an empty list stays permissive
    let mut cors = Cors::new();
    for origin in &app_data.settings.allowed_origins {
        cors = cors.allow_origin(origin.as_str());
    }

    let bind_addr = app_data.settings.bind_addr.clone();
    tracing::info!(addr = %bind_addr, "Starting server");

    Server::new(TcpListener::bind(bind_addr))
        .run(app.with(cors))
        .await
}
