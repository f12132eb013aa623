//! Logger setup shared by the server and client binaries.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise the crate named by `bin_name` logs at
/// `default_level` and everything else at `info`.
pub fn setup_logger(bin_name: &str, default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(bin_name, default_level)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .try_init();
}

fn default_directives(bin_name: &str, default_level: &str) -> String {
    // Binary names use dashes, tracing targets use underscores.
    let target = bin_name.replace('-', "_");
    format!("info,{target}={default_level},tower_http=debug")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_uses_crate_target() {
        // テスト項目: バイナリ名がクレートのターゲット名に変換される
        // when (操作):
        let directives = default_directives("hiroba-server", "debug");

        // then (期待する結果):
        assert_eq!(directives, "info,hiroba_server=debug,tower_http=debug");
    }
}
