use http_cache_util::config::Config;
use http_cache_util::handler::AppState;
use http_cache_util::{logger, server};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = Config::load()?;
    logger::init(&cfg.logging)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;

    logger::log_server_start(&addr, &cfg);
    let state = Arc::new(AppState::new(cfg));

    tokio::select! {
        () = server::serve(listener, state) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            logger::log_info("Shutdown signal received, stopping server");
        }
    }
    Ok(())
}
