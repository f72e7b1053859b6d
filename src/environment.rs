use std::fmt;
use std::str::FromStr;

use crate::errors::ConfigError;

/// Deployment environments the todo stacks are published under.
///
/// The names double as the API gateway stage names, which is why the
/// API base URLs end in `/demo` and `/prod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Demo,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Environment::Demo, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Demo => "demo",
            Environment::Prod => "prod",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "demo" => Ok(Environment::Demo),
            "prod" => Ok(Environment::Prod),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_names_case_insensitively() {
        assert_eq!("demo".parse::<Environment>().unwrap(), Environment::Demo);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Prod);
    }

    #[test]
    fn rejects_unknown_names() {
        let err = "staging".parse::<Environment>().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownEnvironment(ref name) if name == "staging"));
        assert!(err.to_string().contains("staging"));
    }

    #[test]
    fn display_round_trips() {
        for environment in Environment::ALL {
            assert_eq!(
                environment.to_string().parse::<Environment>().unwrap(),
                environment
            );
        }
    }
}
