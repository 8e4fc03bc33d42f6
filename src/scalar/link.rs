//! Absolute addresses of host-side states: `/state/scalar/value/number`,
//! `/app/example` or `http://127.0.0.1:8702/app/balance/left`.

use std::fmt;

use serde::{Serialize, Serializer, ser::SerializeMap};

use crate::diagnostics::{CompileResult, Diagnostic, INVALID_LINK};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    protocol: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    segments: Vec<String>,
}

impl Link {
    /// Parse an absolute link. Relative (`$name`) addresses are references, not links.
    pub fn parse(link: &str) -> CompileResult<Self> {
        let invalid = |reason: &str| {
            Box::new(Diagnostic::make_error(&INVALID_LINK, &[link, reason]).with_reference(link))
        };

        if link.starts_with('$') {
            return Err(invalid("a link must be absolute, `$` addresses are references"));
        }

        let (protocol, host, port, path) = match link.find("://") {
            Some(0) => return Err(invalid("missing protocol")),
            Some(i) => {
                let protocol = &link[..i];
                let rest = &link[i + 3..];
                let (authority, path) = match rest.find('/') {
                    Some(j) => (&rest[..j], &rest[j..]),
                    None => (rest, ""),
                };

                let (host, port) = match authority.split_once(':') {
                    Some((host, port)) => {
                        let port = port.parse::<u16>().map_err(|_| invalid("invalid port"))?;
                        (host, Some(port))
                    }
                    None => (authority, None),
                };

                if host.is_empty() {
                    return Err(invalid("missing host"));
                }

                (Some(protocol.to_string()), Some(host.to_string()), port, path)
            }
            None if link.starts_with('/') => (None, None, None, link),
            None => return Err(invalid("expected a leading `/` or a protocol")),
        };

        let mut segments = Vec::new();
        for segment in path.split('/').skip(1) {
            if segment.is_empty() {
                if path.len() > 1 {
                    return Err(invalid("empty path segment"));
                }
                continue;
            }
            if segment.chars().any(|c| c.is_whitespace() || c == '$') {
                return Err(invalid("path segments may not contain whitespace or `$`"));
            }
            segments.push(segment.to_string());
        }

        Ok(Self {
            protocol,
            host,
            port,
            segments,
        })
    }

    /// A host-local path built from known-good segments.
    pub(crate) fn from_path(segments: &[&str]) -> Self {
        Self {
            protocol: None,
            host: None,
            port: None,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Append a segment to this link.
    pub fn append(&self, segment: impl Into<String>) -> Self {
        let segment = segment.into();
        if segment.is_empty() {
            return self.clone();
        }

        let mut link = self.clone();
        link.segments.push(segment);
        link
    }

    /// This link on another port of the same host. A path-only link is unchanged.
    pub fn with_port(&self, port: u16) -> Self {
        let mut link = self.clone();
        if link.host.is_some() {
            link.port = Some(port);
        }
        link
    }

    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// The path of this link without its protocol, host and port.
    pub fn path(&self) -> Self {
        Self {
            protocol: None,
            host: None,
            port: None,
            segments: self.segments.clone(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if `self` is `prefix` or a path below it on the same host.
    pub fn starts_with(&self, prefix: &Link) -> bool {
        self.protocol == prefix.protocol
            && self.host == prefix.host
            && self.port == prefix.port
            && self.segments.starts_with(&prefix.segments)
    }

    /// Returns true if this link addresses a host-native class such as `/state/...` or `/error/...`.
    pub fn is_native(&self) -> bool {
        self.host.is_none()
            && matches!(
                self.segments.first().map(String::as_str),
                Some("state") | Some("error")
            )
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(protocol), Some(host)) = (&self.protocol, &self.host) {
            write!(f, "{}://{}", protocol, host)?;
            if let Some(port) = self.port {
                write!(f, ":{}", port)?;
            }
        } else if self.segments.is_empty() {
            return f.write_str("/");
        }

        for segment in &self.segments {
            write!(f, "/{}", segment)?;
        }

        Ok(())
    }
}

/// A link used as a value is a reference to the state it addresses: `{"/app/example": []}`.
impl Serialize for Link {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.to_string(), &[(); 0])?;
        map.end()
    }
}
