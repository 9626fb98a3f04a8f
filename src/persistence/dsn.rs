//! Data source name parsing.
//!
//! The service is configured with a driver-style DSN such as
//! `root:secret@tcp(127.0.0.1:3306)/orders?charset=utf8mb4&parseTime=True&loc=Local`.
//! [`DataSourceName`] parses that form (or a plain `mysql://` URL) into
//! [`MySqlConnectOptions`] so the rest of the crate never handles the raw
//! string.

use std::fmt;
use std::str::FromStr;

use sqlx::mysql::MySqlConnectOptions;

use crate::error::OrderServiceError;

const DEFAULT_PORT: u16 = 3306;

/// Network address part of a DSN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    /// `tcp(host:port)`.
    Tcp {
        /// Host name or IP.
        host: String,
        /// TCP port.
        port: u16,
    },
    /// `unix(/path/to/mysqld.sock)`.
    Unix(String),
}

/// A parsed MySQL data source name.
#[derive(Clone, PartialEq, Eq)]
pub enum DataSourceName {
    /// `user:password@tcp(host:port)/database?params`.
    Driver {
        /// Login user.
        user: String,
        /// Login password, if any.
        password: Option<String>,
        /// Server address.
        address: Address,
        /// Default schema.
        database: String,
        /// Query parameters in their original order.
        params: Vec<(String, String)>,
    },
    /// `mysql://...` URL, handed to sqlx as-is.
    Url(String),
}

impl DataSourceName {
    /// Parses a DSN in either driver or URL form.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidConfig`] if the string is not a
    /// well-formed DSN.
    pub fn parse(raw: &str) -> Result<Self, OrderServiceError> {
        let raw = raw.trim();
        if raw.starts_with("mysql://") || raw.starts_with("mariadb://") {
            return Ok(Self::Url(raw.to_string()));
        }

        let invalid = |reason: &str| OrderServiceError::InvalidConfig(format!("dsn: {reason}"));

        let (credentials, rest) = raw
            .rsplit_once('@')
            .ok_or_else(|| invalid("missing '@' between credentials and address"))?;
        let (user, password) = match credentials.split_once(':') {
            Some((user, password)) => (user, Some(password.to_string())),
            None => (credentials, None),
        };
        if user.is_empty() {
            return Err(invalid("empty user"));
        }

        let (address, rest) = parse_address(rest).ok_or_else(|| invalid("bad address"))?;

        let rest = rest
            .strip_prefix('/')
            .ok_or_else(|| invalid("missing '/' before database name"))?;
        let (database, query) = match rest.split_once('?') {
            Some((database, query)) => (database, query),
            None => (rest, ""),
        };
        if database.is_empty() {
            return Err(invalid("empty database name"));
        }

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((key, value)) => (key.to_string(), value.to_string()),
                None => (pair.to_string(), String::new()),
            })
            .collect();

        Ok(Self::Driver {
            user: user.to_string(),
            password,
            address,
            database: database.to_string(),
            params,
        })
    }

    /// Builds sqlx connect options from the parsed DSN.
    ///
    /// `charset` is applied; `parseTime` and `loc` are accepted and have no
    /// effect because timestamps are decoded into typed UTC values.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::InvalidConfig`] if a URL-form DSN is
    /// rejected by sqlx.
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, OrderServiceError> {
        match self {
            Self::Url(url) => MySqlConnectOptions::from_str(url)
                .map_err(|e| OrderServiceError::InvalidConfig(format!("dsn: {e}"))),
            Self::Driver {
                user,
                password,
                address,
                database,
                params,
            } => {
                let mut options = MySqlConnectOptions::new().username(user).database(database);
                if let Some(password) = password {
                    options = options.password(password);
                }
                options = match address {
                    Address::Tcp { host, port } => options.host(host).port(*port),
                    Address::Unix(path) => options.socket(path),
                };
                for (key, value) in params {
                    match key.as_str() {
                        "charset" => options = options.charset(value),
                        "parseTime" | "loc" => {}
                        other => tracing::debug!(param = other, "ignoring unsupported dsn parameter"),
                    }
                }
                Ok(options)
            }
        }
    }
}

fn parse_address(rest: &str) -> Option<(Address, &str)> {
    if let Some(inner) = rest.strip_prefix("tcp(") {
        let (host_port, rest) = inner.split_once(')')?;
        let (host, port) = match host_port.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().ok()?),
            None => (host_port, DEFAULT_PORT),
        };
        if host.is_empty() {
            return None;
        }
        return Some((
            Address::Tcp {
                host: host.to_string(),
                port,
            },
            rest,
        ));
    }
    if let Some(inner) = rest.strip_prefix("unix(") {
        let (path, rest) = inner.split_once(')')?;
        return Some((Address::Unix(path.to_string()), rest));
    }
    None
}

impl FromStr for DataSourceName {
    type Err = OrderServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Passwords never reach logs.
impl fmt::Display for DataSourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => match url.split_once('@') {
                Some((scheme_user, host)) => {
                    let scheme_user = scheme_user
                        .rsplit_once(':')
                        .filter(|(scheme, _)| scheme.contains("//"))
                        .map_or(scheme_user, |(scheme_user, _)| scheme_user);
                    write!(f, "{scheme_user}:***@{host}")
                }
                None => f.write_str(url),
            },
            Self::Driver {
                user,
                address,
                database,
                ..
            } => {
                write!(f, "{user}:***@")?;
                match address {
                    Address::Tcp { host, port } => write!(f, "tcp({host}:{port})")?,
                    Address::Unix(path) => write!(f, "unix({path})")?,
                }
                write!(f, "/{database}")
            }
        }
    }
}

impl fmt::Debug for DataSourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DataSourceName({self})")
    }
}
