//! Credential resolution.
//!
//! Credentials arrive as a loosely-typed mapping (a profile's `outputs`
//! entry) or as a `hive://` connection string. Resolving only picks the
//! recognized keys and fills defaults; values are type-checked when a session
//! is about to be opened, so a malformed value surfaces as a connection
//! failure rather than a resolve error.

use crate::error::ConnectionError;
use crate::transport::{value_as_string, AuthMode, SessionParams, DEFAULT_PORT};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Schema used when the credentials do not name one.
pub const DEFAULT_SCHEMA: &str = "default";

/// Resolved connection credentials.
///
/// Values are kept as they were supplied; [`Credentials::session_params`]
/// performs the conversion to typed driver parameters.
#[derive(Clone, PartialEq)]
pub struct Credentials {
    host: Option<Value>,
    port: Option<Value>,
    schema: Value,
    user: Option<Value>,
    password: Option<Value>,
    auth: Option<Value>,
    kerberos_service_name: Option<Value>,
    configuration: Option<Value>,
}

impl Credentials {
    /// Resolve credentials from a configuration mapping.
    ///
    /// Only `host`, `port`, `schema`, `user`, `password`, `auth`,
    /// `kerberos_service_name` and `configuration` are read; other keys are
    /// ignored. Missing keys (and keys set to `null`) take their defaults: `schema`
    /// becomes `"default"`, everything else stays absent.
    pub fn resolve(options: &Map<String, Value>) -> Self {
        Self {
            host: coalesce(options, "host"),
            port: coalesce(options, "port"),
            schema: coalesce(options, "schema")
                .unwrap_or_else(|| Value::String(DEFAULT_SCHEMA.to_string())),
            user: coalesce(options, "user"),
            password: coalesce(options, "password"),
            auth: coalesce(options, "auth"),
            kerberos_service_name: coalesce(options, "kerberos_service_name"),
            configuration: coalesce(options, "configuration"),
        }
    }

    /// Resolve credentials from a JSON value, which must be an object.
    pub fn from_json(value: &Value) -> Result<Self, ConnectionError> {
        match value {
            Value::Object(map) => Ok(Self::resolve(map)),
            other => Err(ConnectionError::ParseError(format!(
                "Expected a credentials object, got: {}",
                other
            ))),
        }
    }

    /// The schema as supplied, rendered as text.
    pub fn schema(&self) -> String {
        value_as_string(&self.schema).unwrap_or_else(|| DEFAULT_SCHEMA.to_string())
    }

    /// The host as supplied, rendered as text.
    pub fn host(&self) -> Option<String> {
        self.host.as_ref().and_then(value_as_string)
    }

    /// The user as supplied, rendered as text.
    pub fn user(&self) -> Option<String> {
        self.user.as_ref().and_then(value_as_string)
    }

    /// Convert the raw values into driver session parameters.
    ///
    /// # Errors
    ///
    /// Returns `ConnectionError::InvalidParameter` when a value has the wrong
    /// type or when the auth mode and its companion settings disagree
    /// (a password only with LDAP/CUSTOM, a Kerberos service name only with
    /// KERBEROS).
    pub fn session_params(&self) -> Result<SessionParams, ConnectionError> {
        let host = match &self.host {
            Some(value) => expect_string("host", value)?,
            None => {
                return Err(ConnectionError::InvalidParameter {
                    parameter: "host".to_string(),
                    message: "Host is required".to_string(),
                })
            }
        };

        let port = match &self.port {
            Some(value) => parse_port(value)?,
            None => DEFAULT_PORT,
        };

        let database = expect_string("schema", &self.schema)?;
        let username = self
            .user
            .as_ref()
            .map(|v| expect_string("user", v))
            .transpose()?;
        let password = self
            .password
            .as_ref()
            .map(|v| expect_string("password", v))
            .transpose()?;

        let auth = match &self.auth {
            Some(value) => AuthMode::from_str(&expect_string("auth", value)?)?,
            None => AuthMode::None,
        };

        let kerberos_service_name = self
            .kerberos_service_name
            .as_ref()
            .map(|v| expect_string("kerberos_service_name", v))
            .transpose()?;

        if password.is_some() != auth.accepts_password() {
            return Err(ConnectionError::InvalidParameter {
                parameter: "password".to_string(),
                message: "Password should be set if and only if in LDAP or CUSTOM mode"
                    .to_string(),
            });
        }

        if kerberos_service_name.is_some() != (auth == AuthMode::Kerberos) {
            return Err(ConnectionError::InvalidParameter {
                parameter: "kerberos_service_name".to_string(),
                message: "kerberos_service_name should be set if and only if in KERBEROS mode"
                    .to_string(),
            });
        }

        let configuration = match &self.configuration {
            Some(value) => parse_configuration(value)?,
            None => HashMap::new(),
        };

        Ok(SessionParams {
            host,
            port,
            database,
            username,
            password,
            auth,
            kerberos_service_name,
            configuration,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("schema", &self.schema)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("auth", &self.auth)
            .field("kerberos_service_name", &self.kerberos_service_name)
            .field("configuration", &self.configuration)
            .finish()
    }
}

impl fmt::Display for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hive://")?;
        if let Some(user) = self.user() {
            write!(f, "{}@", user)?;
        }
        write!(f, "{}", self.host().unwrap_or_default())?;
        if let Some(port) = self.port.as_ref().and_then(value_as_string) {
            write!(f, ":{}", port)?;
        }
        write!(f, "/{}", self.schema())
    }
}

impl FromStr for Credentials {
    type Err = ConnectionError;

    /// Parse a connection string of the form
    /// `hive://[user[:password]@]host[:port][/schema][?key=value&...]`.
    ///
    /// `auth` and `kerberos_service_name` query keys map to the matching
    /// credentials; any other key becomes an engine configuration override.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rest = s.strip_prefix("hive://").ok_or_else(|| {
            ConnectionError::ParseError(format!(
                "Connection string must start with 'hive://': {}",
                s
            ))
        })?;

        let (location, query) = match rest.split_once('?') {
            Some((location, query)) => (location, Some(query)),
            None => (rest, None),
        };

        let (authority, schema) = match location.split_once('/') {
            Some((authority, schema)) if !schema.is_empty() => (authority, Some(schema)),
            Some((authority, _)) => (authority, None),
            None => (location, None),
        };

        let (user_info, host_port) = match authority.rsplit_once('@') {
            Some((user_info, host_port)) => (Some(user_info), host_port),
            None => (None, authority),
        };

        let mut options = Map::new();

        if let Some(user_info) = user_info {
            let (user, password) = parse_auth(user_info)?;
            options.insert("user".to_string(), Value::String(user));
            if let Some(password) = password {
                options.insert("password".to_string(), Value::String(password));
            }
        }

        let (host, port) = parse_host_port(host_port)?;
        if host.is_empty() {
            return Err(ConnectionError::ParseError(
                "Missing host in connection string".to_string(),
            ));
        }
        options.insert("host".to_string(), Value::String(host));
        if let Some(port) = port {
            options.insert("port".to_string(), Value::from(port));
        }

        if let Some(schema) = schema {
            let schema = urlencoding::decode(schema)
                .map_err(|e| ConnectionError::ParseError(format!("Failed to decode schema: {}", e)))?
                .into_owned();
            options.insert("schema".to_string(), Value::String(schema));
        }

        let mut configuration = Map::new();
        for (key, value) in parse_query_params(query)? {
            match key.as_str() {
                "auth" | "kerberos_service_name" => {
                    options.insert(key, Value::String(value));
                }
                _ => {
                    configuration.insert(key, Value::String(value));
                }
            }
        }
        if !configuration.is_empty() {
            options.insert("configuration".to_string(), Value::Object(configuration));
        }

        Ok(Self::resolve(&options))
    }
}

fn coalesce(options: &Map<String, Value>, key: &str) -> Option<Value> {
    match options.get(key) {
        Some(Value::Null) | None => None,
        Some(value) => Some(value.clone()),
    }
}

fn expect_string(parameter: &str, value: &Value) -> Result<String, ConnectionError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        other => Err(ConnectionError::InvalidParameter {
            parameter: parameter.to_string(),
            message: format!("Expected a string, got: {}", other),
        }),
    }
}

fn parse_port(value: &Value) -> Result<u16, ConnectionError> {
    let invalid = || ConnectionError::InvalidParameter {
        parameter: "port".to_string(),
        message: format!("Invalid port: {}", value),
    };

    let port = match value {
        Value::Number(n) => n.as_u64().ok_or_else(invalid)?,
        Value::String(s) => s.trim().parse::<u64>().map_err(|_| invalid())?,
        _ => return Err(invalid()),
    };

    match u16::try_from(port) {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(invalid()),
    }
}

fn parse_configuration(value: &Value) -> Result<HashMap<String, String>, ConnectionError> {
    match value {
        Value::Object(map) => Ok(map
            .iter()
            .filter_map(|(k, v)| value_as_string(v).map(|v| (k.clone(), v)))
            .collect()),
        other => Err(ConnectionError::InvalidParameter {
            parameter: "configuration".to_string(),
            message: format!("Expected a mapping of settings, got: {}", other),
        }),
    }
}

/// Parse query parameters from URL query string.
fn parse_query_params(query: Option<&str>) -> Result<Vec<(String, String)>, ConnectionError> {
    let mut params = Vec::new();

    if let Some(query) = query {
        for pair in query.split('&') {
            if pair.is_empty() {
                continue;
            }

            let (key, value) = pair.split_once('=').ok_or_else(|| {
                ConnectionError::ParseError(format!("Invalid query parameter format: {}", pair))
            })?;

            let key = urlencoding::decode(key)
                .map_err(|e| ConnectionError::ParseError(format!("Failed to decode key: {}", e)))?
                .into_owned();
            let value = urlencoding::decode(value)
                .map_err(|e| ConnectionError::ParseError(format!("Failed to decode value: {}", e)))?
                .into_owned();

            params.push((key, value));
        }
    }

    Ok(params)
}

/// Parse authentication part (user[:password]).
fn parse_auth(auth: &str) -> Result<(String, Option<String>), ConnectionError> {
    let decode = |part: &str, what: &str| {
        urlencoding::decode(part)
            .map(|s| s.into_owned())
            .map_err(|e| ConnectionError::ParseError(format!("Failed to decode {}: {}", what, e)))
    };

    match auth.split_once(':') {
        Some((user, pass)) => Ok((decode(user, "user")?, Some(decode(pass, "password")?))),
        None => Ok((decode(auth, "user")?, None)),
    }
}

/// Parse host and optional port.
fn parse_host_port(host_port: &str) -> Result<(String, Option<u16>), ConnectionError> {
    // [ipv6]:port
    if let Some(stripped) = host_port.strip_prefix('[') {
        if let Some((host, port_part)) = stripped.split_once(']') {
            let port = match port_part.strip_prefix(':') {
                Some(port) => Some(port.parse().map_err(|_| {
                    ConnectionError::ParseError(format!("Invalid port: {}", port))
                })?),
                None => None,
            };
            return Ok((host.to_string(), port));
        }
    }

    match host_port.rsplit_once(':') {
        Some((host, port_str)) => {
            let port = port_str
                .parse()
                .map_err(|_| ConnectionError::ParseError(format!("Invalid port: {}", port_str)))?;
            Ok((host.to_string(), Some(port)))
        }
        None => Ok((host_port.to_string(), None)),
    }
}
