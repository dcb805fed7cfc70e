// SPDX-License-Identifier: GPL-3.0-only

//! Decode results and their interpretation

/// Rectangle within a frame, normalized to `0.0..=1.0` of the frame size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl FrameRegion {
    pub fn from_pixels(
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        frame_width: u32,
        frame_height: u32,
    ) -> Self {
        Self {
            x: x as f32 / frame_width as f32,
            y: y as f32 / frame_height as f32,
            width: width as f32 / frame_width as f32,
            height: height as f32 / frame_height as f32,
        }
    }
}

/// Kind of content a decoded text represents
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResult {
    Uri(String),
    Wifi {
        ssid: String,
        password: Option<String>,
        /// Authentication type as written in the code (`WPA`, `WEP`, `nopass`)
        auth: Option<String>,
        hidden: bool,
    },
    Tel(String),
    Email {
        to: String,
        subject: Option<String>,
        body: Option<String>,
    },
    Sms {
        number: String,
        body: Option<String>,
    },
    Geo {
        lat: f64,
        lon: f64,
        query: Option<String>,
    },
    Text(String),
}

impl ParsedResult {
    /// Classify decoded text, falling back to [`ParsedResult::Text`]
    pub fn parse(text: &str) -> Self {
        let text = text.trim();

        if let Some(rest) = strip_prefix_ignore_case(text, "WIFI:") {
            return parse_wifi(rest);
        }
        if let Some(rest) = strip_prefix_ignore_case(text, "tel:") {
            return Self::Tel(rest.to_string());
        }
        if let Some(rest) = strip_prefix_ignore_case(text, "mailto:") {
            let (to, query) = rest.split_once('?').unwrap_or((rest, ""));
            return Self::Email {
                to: to.to_string(),
                subject: query_param(query, "subject"),
                body: query_param(query, "body"),
            };
        }
        if let Some(rest) = strip_prefix_ignore_case(text, "smsto:")
            .or_else(|| strip_prefix_ignore_case(text, "sms:"))
        {
            return parse_sms(rest);
        }
        if let Some(rest) = strip_prefix_ignore_case(text, "geo:")
            && let Some(geo) = parse_geo(rest)
        {
            return geo;
        }
        if strip_prefix_ignore_case(text, "http://").is_some()
            || strip_prefix_ignore_case(text, "https://").is_some()
        {
            return Self::Uri(text.to_string());
        }
        if text.starts_with("www.") && !text.contains(char::is_whitespace) {
            return Self::Uri(format!("https://{}", text));
        }

        Self::Text(text.to_string())
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Uri(_) => "URL",
            Self::Wifi { .. } => "Wi-Fi",
            Self::Tel(_) => "Phone",
            Self::Email { .. } => "Email",
            Self::Sms { .. } => "SMS",
            Self::Geo { .. } => "Location",
            Self::Text(_) => "Text",
        }
    }

    /// URI to hand to the desktop opener, if this kind has one
    pub fn open_target(&self) -> Option<String> {
        match self {
            Self::Uri(uri) => Some(uri.clone()),
            Self::Tel(number) => Some(format!("tel:{}", number)),
            Self::Email { to, subject, body } => {
                let mut params = Vec::new();
                if let Some(subject) = subject {
                    params.push(format!("subject={}", urlencoding::encode(subject)));
                }
                if let Some(body) = body {
                    params.push(format!("body={}", urlencoding::encode(body)));
                }
                if params.is_empty() {
                    Some(format!("mailto:{}", to))
                } else {
                    Some(format!("mailto:{}?{}", to, params.join("&")))
                }
            }
            Self::Sms { number, .. } => Some(format!("sms:{}", number)),
            Self::Geo { lat, lon, .. } => Some(format!("geo:{},{}", lat, lon)),
            Self::Wifi { .. } | Self::Text(_) => None,
        }
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}

/// Split on unescaped `;`, the field separator of the Wi-Fi format
fn split_wifi_fields(content: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = content.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            }
            ';' => fields.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.is_empty() {
        fields.push(current);
    }
    fields
}

fn parse_wifi(content: &str) -> ParsedResult {
    let mut ssid = String::new();
    let mut password = None;
    let mut auth = None;
    let mut hidden = false;

    for field in split_wifi_fields(content) {
        let Some((key, value)) = field.split_once(':') else {
            continue;
        };
        match key {
            "S" => ssid = value.to_string(),
            "P" if !value.is_empty() => password = Some(value.to_string()),
            "T" if !value.is_empty() => auth = Some(value.to_string()),
            "H" => hidden = value.eq_ignore_ascii_case("true"),
            _ => {}
        }
    }

    ParsedResult::Wifi {
        ssid,
        password,
        auth,
        hidden,
    }
}

fn parse_sms(content: &str) -> ParsedResult {
    // smsto:number:body and sms:number?body=...
    if let Some((number, query)) = content.split_once('?') {
        return ParsedResult::Sms {
            number: number.to_string(),
            body: query_param(query, "body"),
        };
    }
    match content.split_once(':') {
        Some((number, body)) => ParsedResult::Sms {
            number: number.to_string(),
            body: (!body.is_empty()).then(|| body.to_string()),
        },
        None => ParsedResult::Sms {
            number: content.to_string(),
            body: None,
        },
    }
}

fn parse_geo(content: &str) -> Option<ParsedResult> {
    let (coords, query) = content.split_once('?').unwrap_or((content, ""));
    let mut parts = coords.split(',');
    let lat = parts.next()?.trim().parse::<f64>().ok()?;
    let lon = parts.next()?.trim().parse::<f64>().ok()?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
        return None;
    }
    Some(ParsedResult::Geo {
        lat,
        lon,
        query: query_param(query, "q"),
    })
}

fn query_param(query: &str, name: &str) -> Option<String> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| percent_decode(value))
}

/// Decode a query value, `+` meaning space
fn percent_decode(s: &str) -> String {
    let spaced = s.replace('+', " ");
    String::from_utf8_lossy(&urlencoding::decode_binary(spaced.as_bytes())).into_owned()
}

/// A decoded QR code and where it was found
#[derive(Debug, Clone, PartialEq)]
pub struct QrDetection {
    /// Bounds normalized to the decoded crop
    pub bounds: FrameRegion,
    pub content: String,
    pub parsed: ParsedResult,
}

impl QrDetection {
    pub fn new(bounds: FrameRegion, content: String) -> Self {
        let parsed = ParsedResult::parse(&content);
        Self {
            bounds,
            content,
            parsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_urls() {
        assert_eq!(
            ParsedResult::parse("https://example.com/a?b=c"),
            ParsedResult::Uri("https://example.com/a?b=c".to_string())
        );
        assert_eq!(
            ParsedResult::parse("HTTP://EXAMPLE.COM"),
            ParsedResult::Uri("HTTP://EXAMPLE.COM".to_string())
        );
        assert_eq!(
            ParsedResult::parse("www.example.org"),
            ParsedResult::Uri("https://www.example.org".to_string())
        );
    }

    #[test]
    fn test_parse_wifi_with_escapes() {
        let parsed = ParsedResult::parse(r"WIFI:T:WPA;S:Cafe\;Net;P:pa\:ss;H:true;;");
        assert_eq!(
            parsed,
            ParsedResult::Wifi {
                ssid: "Cafe;Net".to_string(),
                password: Some("pa:ss".to_string()),
                auth: Some("WPA".to_string()),
                hidden: true,
            }
        );
        assert_eq!(parsed.open_target(), None);
    }

    #[test]
    fn test_parse_open_wifi() {
        match ParsedResult::parse("WIFI:S:Guest;T:nopass;P:;;") {
            ParsedResult::Wifi { ssid, password, .. } => {
                assert_eq!(ssid, "Guest");
                assert_eq!(password, None);
            }
            other => panic!("Expected Wifi, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_mailto() {
        let parsed = ParsedResult::parse("mailto:someone@example.com?subject=Hi%20there&body=a+b");
        assert_eq!(
            parsed,
            ParsedResult::Email {
                to: "someone@example.com".to_string(),
                subject: Some("Hi there".to_string()),
                body: Some("a b".to_string()),
            }
        );
        assert_eq!(
            parsed.open_target().unwrap(),
            "mailto:someone@example.com?subject=Hi%20there&body=a%20b"
        );
    }

    #[test]
    fn test_parse_sms_variants() {
        assert_eq!(
            ParsedResult::parse("SMSTO:+15551234:see you"),
            ParsedResult::Sms {
                number: "+15551234".to_string(),
                body: Some("see you".to_string()),
            }
        );
        assert_eq!(
            ParsedResult::parse("sms:+15551234?body=hello"),
            ParsedResult::Sms {
                number: "+15551234".to_string(),
                body: Some("hello".to_string()),
            }
        );
    }

    #[test]
    fn test_parse_geo() {
        match ParsedResult::parse("geo:48.8584,2.2945?q=Eiffel+Tower") {
            ParsedResult::Geo { lat, lon, query } => {
                assert!((lat - 48.8584).abs() < 1e-9);
                assert!((lon - 2.2945).abs() < 1e-9);
                assert_eq!(query.as_deref(), Some("Eiffel Tower"));
            }
            other => panic!("Expected Geo, got {:?}", other),
        }
        // Out of range falls back to text
        assert!(matches!(
            ParsedResult::parse("geo:123,456"),
            ParsedResult::Text(_)
        ));
    }

    #[test]
    fn test_parse_tel_and_text() {
        assert_eq!(
            ParsedResult::parse("tel:+441234"),
            ParsedResult::Tel("+441234".to_string())
        );
        let text = ParsedResult::parse("  just some words ");
        assert_eq!(text, ParsedResult::Text("just some words".to_string()));
        assert_eq!(text.display_name(), "Text");
    }

    #[test]
    fn test_percent_decode_keeps_bad_escapes() {
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%C3%A9"), "é");
        assert_eq!(percent_decode("a+b%2Bc"), "a b+c");
    }

    #[test]
    fn test_frame_region_from_pixels() {
        let region = FrameRegion::from_pixels(100, 50, 200, 100, 1000, 500);
        assert!((region.x - 0.1).abs() < 0.001);
        assert!((region.y - 0.1).abs() < 0.001);
        assert!((region.width - 0.2).abs() < 0.001);
        assert!((region.height - 0.2).abs() < 0.001);
    }
}
