use anyhow::Context;
use pmgr::domain::config::{ApiConfig, LogConfig};
use pmgr::kernel::config::load_config;
use pmgr_logger::Logger;
use pmgr_server::Server;

#[cfg(feature = "profiling")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn init_logger(log: &LogConfig) -> anyhow::Result<Logger> {
    let builder = Logger::builder()
        .name(env!("CARGO_PKG_NAME"))
        .level_str(&log.level)?
        .env_filter(log.filter.clone().unwrap_or_default());

    let logger = match &log.dir {
        Some(dir) => builder
            .path(dir)
            .rotation_str(&log.rotation)?
            .max_files(log.max_files)
            .json(log.json)
            .init()?,
        None => builder.init()?,
    };
    Ok(logger)
}

#[pmgr_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    #[cfg(feature = "profiling")]
    let _profiler = dhat::Profiler::new_heap();

    let cfg: ApiConfig = load_config(std::env::args().nth(1))
        .context("Critical: Configuration is malformed")?;
    let _log = init_logger(&cfg.log)?;

    Server::builder().config(cfg).build().await?.run().await
}
