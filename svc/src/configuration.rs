use std::{
    error::Error,
    fmt::{self, Display},
    path::Path,
    time::Duration,
};

use serde_aux::field_attributes::deserialize_option_number_from_string;
use url::Url;

/// Runtime environment for the service.
#[derive(Debug, PartialEq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

#[derive(Debug)]
pub enum ConfigurationError {
    Config(config::ConfigError),
    Io(std::io::Error),
    Environment(String),
    LocalDirectoryInProduction(String),
}

impl Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigurationError::Config(err) => write!(f, "{}", err),
            ConfigurationError::Io(err) => write!(f, "{}", err),
            ConfigurationError::Environment(err) => write!(f, "{}", err),
            ConfigurationError::LocalDirectoryInProduction(url) => {
                write!(f, "Don't use a local user directory ({}) in production.", url)
            }
        }
    }
}

impl Error for ConfigurationError {}

impl From<config::ConfigError> for ConfigurationError {
    fn from(value: config::ConfigError) -> Self {
        ConfigurationError::Config(value)
    }
}

impl From<std::io::Error> for ConfigurationError {
    fn from(value: std::io::Error) -> Self {
        ConfigurationError::Io(value)
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Application {
    pub name: String,
    pub log_filter: String,
}

/// Location of the remote user directory.
#[derive(serde::Deserialize, Clone, Debug)]
pub struct Directory {
    pub base_url: String,
    pub users_path: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_ms: Option<u64>,
}

impl Directory {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    fn is_local(&self) -> bool {
        match Url::parse(&self.base_url) {
            Ok(url) => matches!(
                url.host_str(),
                Some("localhost") | Some("127.0.0.1") | Some("[::1]")
            ),
            Err(_) => false,
        }
    }
}

#[derive(serde::Deserialize, Clone, Debug)]
pub struct Configuration {
    pub application: Application,
    pub directory: Directory,
}

impl Configuration {
    /// Reads the configuration from `./configuration`.
    pub fn parse(key: &str) -> Result<Configuration, ConfigurationError> {
        let base_path = std::env::current_dir()?;
        Self::parse_from(&base_path.join("configuration"), key)
    }

    /// Reads `base.yaml`, then `<environment>.yaml` from the provided directory
    /// and finally the environment variables prefixed with `<key>_`.
    pub fn parse_from(
        configuration_directory: &Path,
        key: &str,
    ) -> Result<Configuration, ConfigurationError> {
        let key = key.to_uppercase();

        // Detect the runtime environment, if none is provided use local.
        let environment =
            Environment::try_from(std::env::var(&key).unwrap_or_else(|_| "local".into()))
                .map_err(ConfigurationError::Environment)?;
        let environment_filename = format!("{}.yaml", environment.as_str());

        let conf = config::Config::builder()
            .add_source(config::File::from(
                configuration_directory.join("base.yaml"),
            ))
            .add_source(config::File::from(
                configuration_directory.join(environment_filename),
            ))
            // E.g. `<key>_DIRECTORY__BASE_URL=http://users:3004` sets `directory.base_url`
            .add_source(
                config::Environment::with_prefix(&key)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let conf = conf.try_deserialize::<Configuration>()?;

        if environment == Environment::Production && conf.directory.is_local() {
            return Err(ConfigurationError::LocalDirectoryInProduction(
                conf.directory.base_url,
            ));
        }
        Ok(conf)
    }
}

#[cfg(test)]
mod test {
    use std::path::PathBuf;

    use super::*;

    fn configuration_directory() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("configuration")
    }

    #[test]
    fn it_defaults_to_the_local_environment() {
        let conf = temp_env::with_var_unset("SVC_TEST_DEFAULTS", || {
            Configuration::parse_from(&configuration_directory(), "svc_test_defaults")
        })
        .expect("Should be able to parse configuration");

        assert_eq!(conf.application.name, "authorizer");
        assert_eq!(conf.application.log_filter, "debug");
        assert_eq!(conf.directory.base_url, "http://localhost:3004");
        assert_eq!(conf.directory.users_path, "/users");
        assert_eq!(conf.directory.timeout(), None);
    }

    #[test]
    fn it_reads_from_the_working_directory() {
        // Tests run from the crate root, which holds `configuration/`.
        let conf = temp_env::with_var_unset("SVC_TEST_WORKING_DIRECTORY", || {
            Configuration::parse("svc_test_working_directory")
        })
        .expect("Should be able to parse configuration");

        assert_eq!(conf.directory.base_url, "http://localhost:3004");
        assert_eq!(conf.directory.users_path, "/users");
    }

    #[test]
    fn it_can_be_overridden_from_the_environment() {
        let conf = temp_env::with_vars(
            [
                ("SVC_TEST_OVERRIDE", Some("local")),
                ("SVC_TEST_OVERRIDE_DIRECTORY__BASE_URL", Some("http://users.internal:8080")),
                ("SVC_TEST_OVERRIDE_DIRECTORY__TIMEOUT_MS", Some("2500")),
            ],
            || Configuration::parse_from(&configuration_directory(), "SVC_TEST_OVERRIDE"),
        )
        .expect("Should be able to parse configuration");

        assert_eq!(conf.directory.base_url, "http://users.internal:8080");
        assert_eq!(conf.directory.timeout(), Some(Duration::from_millis(2500)));
    }

    #[test]
    fn it_reads_the_production_file() {
        let conf = temp_env::with_var("SVC_TEST_PRODUCTION", Some("production"), || {
            Configuration::parse_from(&configuration_directory(), "SVC_TEST_PRODUCTION")
        })
        .expect("Should be able to parse configuration");

        assert_eq!(conf.application.log_filter, "info");
        assert_eq!(conf.directory.base_url, "http://users:3004");
        assert_eq!(conf.directory.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn it_refuses_local_directories_in_production() {
        let result = temp_env::with_vars(
            [
                ("SVC_TEST_GUARD", Some("production")),
                ("SVC_TEST_GUARD_DIRECTORY__BASE_URL", Some("http://localhost:3004")),
            ],
            || Configuration::parse_from(&configuration_directory(), "SVC_TEST_GUARD"),
        );

        assert!(matches!(
            result,
            Err(ConfigurationError::LocalDirectoryInProduction(_))
        ));
    }

    #[test]
    fn it_rejects_unknown_environments() {
        let result = temp_env::with_var("SVC_TEST_UNKNOWN", Some("staging"), || {
            Configuration::parse_from(&configuration_directory(), "SVC_TEST_UNKNOWN")
        });

        assert!(matches!(result, Err(ConfigurationError::Environment(_))));
    }
}
