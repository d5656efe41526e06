use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use haul_tracking::config::environment::EnvironmentConfig;
use haul_tracking::create_app;
use haul_tracking::database::DatabaseConnection;
use haul_tracking::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚚 Haul Tracking - Backend de seguimiento de viajes");
    info!("===================================================");

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    let config = EnvironmentConfig::default();
    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    let app_state = AppState::new(pool, config);
    let app = create_app(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("👤 Endpoints - User:");
    info!("   POST /api/user/register - Registro con OTP");
    info!("   POST /api/user/login - Login con OTP");
    info!("   POST /api/user/verify-otp - Verificar OTP");
    info!("   POST /api/user/resend-otp - Reenviar OTP");
    info!("   GET  /api/user/profile - Perfil");
    info!("   PUT  /api/user/update-profile - Actualizar perfil");
    info!("   PUT  /api/user/check-in - Check-in");
    info!("   PUT  /api/user/check-out - Check-out");
    info!("🚛 Endpoints - Trip:");
    info!("   POST /api/trip - Crear viaje");
    info!("   GET  /api/trip/current - Viaje actual del conductor");
    info!("   GET  /api/trip/history - Historial del conductor");
    info!("   PUT  /api/trip/shift-change/:id - Relevo de conductor");
    info!("   PUT  /api/trip/:id - Registrar hito del viaje");
    info!("   POST /api/trip/sub-trip - Crear sub-viaje");
    info!("   PUT  /api/trip/sub-trip/:id - Registrar hito del sub-viaje");
    info!("🏭 Endpoints - Referencia:");
    info!("   GET  /api/truck/all - Camiones");
    info!("   GET  /api/location - Ubicaciones");
    info!("   GET  /api/mill - Molinos");
    info!("🔐 Endpoints - Admin:");
    info!("   POST /api/admin/login - Login admin");
    info!("   GET  /api/admin/users - Usuarios");
    info!("   GET  /api/admin/trips - Viajes (paginado)");
    info!("   DELETE /api/admin/trip/:id - Borrar viaje");

    // Iniciar servidor
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
