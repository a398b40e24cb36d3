use env_logger::Builder;
use log::LevelFilter;

/// Variable checked before `RUST_LOG` for filter directives.
pub const LOG_ENV: &str = "FILMSHELF_LOG";

/// Log lines share the terminal with the menu, so only warnings and errors
/// show unless a filter is given.
const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// Builds the logger from filter directives in the `env_logger` syntax,
/// e.g. `info` or `filmshelf::clients=debug`.
pub fn builder(filters: Option<&str>) -> Builder {
    let mut builder = Builder::new();
    builder
        .filter_level(DEFAULT_LEVEL)
        .format_timestamp(None)
        .format_target(false);

    if let Some(filters) = filters.map(str::trim).filter(|f| !f.is_empty()) {
        builder.parse_filters(filters);
    }
    builder
}

/// Reads filters through `lookup`, preferring `FILMSHELF_LOG` over `RUST_LOG`.
pub fn filters_from<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    [LOG_ENV, "RUST_LOG"]
        .into_iter()
        .filter_map(&lookup)
        .find(|value| !value.trim().is_empty())
}

/// Installs the global logger. A second call leaves the first logger in place.
pub fn init() {
    let filters = filters_from(|name| std::env::var(name).ok());
    if builder(filters.as_deref()).try_init().is_err() {
        log::debug!("Logger already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(vars: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.to_string())
        }
    }

    #[test]
    fn warnings_only_by_default() {
        assert_eq!(builder(None).build().filter(), LevelFilter::Warn);
        assert_eq!(builder(Some("  ")).build().filter(), LevelFilter::Warn);
    }

    #[test]
    fn filters_raise_the_level() {
        assert_eq!(builder(Some("debug")).build().filter(), LevelFilter::Debug);
        assert_eq!(
            builder(Some("filmshelf::clients=trace")).build().filter(),
            LevelFilter::Trace
        );
    }

    #[test]
    fn own_variable_wins_over_rust_log() {
        let lookup = env(&[("RUST_LOG", "info"), (LOG_ENV, "debug")]);
        assert_eq!(filters_from(lookup).as_deref(), Some("debug"));

        let lookup = env(&[("RUST_LOG", "info"), (LOG_ENV, "")]);
        assert_eq!(filters_from(lookup).as_deref(), Some("info"));

        assert_eq!(filters_from(env(&[])), None);
    }
}
