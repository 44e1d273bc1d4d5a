//! Builders for the payload strings encoded into restaurant QR codes.

/// Alphabet for menu short codes.
const SHORT_CODE_ALPHABET: [char; 62] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '0', '1', '2', '3', '4',
    '5', '6', '7', '8', '9',
];

pub const SHORT_CODE_LEN: usize = 8;

/// Random 8-character alphanumeric code for `/m/{code}` links.
pub fn generate_short_code() -> String {
    nanoid::nanoid!(SHORT_CODE_LEN, &SHORT_CODE_ALPHABET)
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}

/// `{base}/m/{short_code}`
pub fn menu_url(base_url: &str, short_code: &str) -> String {
    format!("{}/m/{short_code}", trim_base(base_url))
}

/// `{base}/r/{restaurant_id}?table={table}`
pub fn table_url(base_url: &str, restaurant_id: &str, table: u32) -> String {
    format!("{}/r/{restaurant_id}?table={table}", trim_base(base_url))
}

/// `{base}/r/{restaurant_id}/{page}`, e.g. `feedback` or `reservation`.
pub fn restaurant_page_url(base_url: &str, restaurant_id: &str, page: &str) -> String {
    format!(
        "{}/r/{restaurant_id}/{}",
        trim_base(base_url),
        page.trim_start_matches('/')
    )
}

/// Wi-Fi network authentication type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiAuth {
    Wpa,
    Wep,
    Open,
}

impl WifiAuth {
    fn as_str(self) -> &'static str {
        match self {
            WifiAuth::Wpa => "WPA",
            WifiAuth::Wep => "WEP",
            WifiAuth::Open => "nopass",
        }
    }
}

impl std::str::FromStr for WifiAuth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wpa" | "wpa2" | "wpa3" => Ok(WifiAuth::Wpa),
            "wep" => Ok(WifiAuth::Wep),
            "open" | "nopass" | "none" => Ok(WifiAuth::Open),
            other => Err(format!("unknown Wi-Fi auth {other:?}")),
        }
    }
}

/// `WIFI:S:{ssid};T:{auth};P:{password};;` with `\ ; , : "` escaped.
pub fn wifi_payload(ssid: &str, password: Option<&str>, auth: WifiAuth) -> String {
    let mut out = format!("WIFI:S:{};T:{};", escape_wifi(ssid), auth.as_str());
    if let Some(pw) = password.filter(|_| auth != WifiAuth::Open) {
        out.push_str(&format!("P:{};", escape_wifi(pw)));
    }
    out.push(';');
    out
}

fn escape_wifi(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | ';' | ',' | ':' | '"') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
