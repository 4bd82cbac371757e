// Church Admin Hub - attendance and finance dashboard backend
//
// Record keeping with seed fallback, dashboard metrics, and AI insights
// generated from recent records.

pub mod database;
pub mod records;
pub mod metrics;
pub mod insights;
pub mod state;

#[cfg(feature = "desktop")]
pub use desktop::run;

#[cfg(feature = "desktop")]
mod desktop {
    use std::sync::Arc;
    use tauri::{Manager, RunEvent};

    use crate::database::DatabaseManager;
    use crate::insights::commands::emit_status;
    use crate::insights::providers::GeminiProvider;
    use crate::insights::{InsightClient, InsightOrchestrator, InsightSettings};
    use crate::records::RecordStore;
    use crate::state::AppState;

    fn setup_error(context: &str, e: impl std::fmt::Display) -> Box<dyn std::error::Error> {
        log::error!("{}: {}", context, e);
        Box::new(std::io::Error::new(
            std::io::ErrorKind::Other,
            format!("{}: {}", context, e),
        ))
    }

    pub fn run() {
        // Initialize env_logger to output to stderr (reads RUST_LOG env var)
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .format_timestamp_millis()
            .init();

        let app = tauri::Builder::default()
            .setup(|app| {
                log::info!("Church Admin Hub setup starting...");

                let db = DatabaseManager::init_with_app_handle(app.handle())
                    .map_err(|e| setup_error("Database initialization failed", e))?;
                let db = Arc::new(db);
                log::info!("Database initialized successfully");

                let settings = InsightSettings::from_env().with_stored_overrides(db.as_ref());
                if settings.api_key.is_none() {
                    log::warn!("No API key configured, insight refreshes will fail");
                }

                let provider = GeminiProvider::new(settings.gemini_config())
                    .map_err(|e| setup_error("Insight provider initialization failed", e))?;
                log::info!("Insight provider ready (model {})", provider.model());

                let client = InsightClient::new(Arc::new(provider), settings.history_window);
                let orchestrator = InsightOrchestrator::new(client, settings.retain_on_failure);
                let records = RecordStore::load(db);

                app.manage(AppState::new(records, orchestrator));

                // Fetch insights once the window is up
                let handle = app.handle().clone();
                tauri::async_runtime::spawn(async move {
                    let state = handle.state::<AppState>();
                    if state.run_startup_refresh().await.is_some() {
                        emit_status(&handle, &state).await;
                    }
                });

                log::info!("Church Admin Hub setup complete");
                Ok(())
            })
            .invoke_handler(tauri::generate_handler![
                // Record commands
                crate::records::commands::get_attendance,
                crate::records::commands::get_finance,
                crate::records::commands::append_attendance,
                crate::records::commands::append_finance,
                crate::records::commands::get_dashboard_summary,
                // Insight commands
                crate::insights::commands::get_insights,
                crate::insights::commands::is_refreshing_insights,
                crate::insights::commands::refresh_insights,
                crate::insights::commands::get_insight_status,
                crate::insights::commands::get_insight_groups,
            ])
            .build(tauri::generate_context!())
            .expect("error while building tauri application");

        app.run(|handle, event| {
            if let RunEvent::Exit = event {
                if let Some(state) = handle.try_state::<AppState>() {
                    state.shutdown();
                }
                log::info!("Church Admin Hub shutting down");
            }
        });
    }
}
