/// RGBA color with 8 bits per channel.
///
/// Parses the CSS hex forms the style layer accepts (`#rgb`, `#rrggbb`,
/// `#rrggbbaa`) and displays as lowercase `#rrggbb` (alpha appended only when
/// not fully opaque).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseColorError(pub String);

impl std::fmt::Display for ParseColorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid hex color: {}", self.0)
    }
}

impl std::error::Error for ParseColorError {}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl std::str::FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| ParseColorError(s.to_string()))?;
        let err = || ParseColorError(s.to_string());

        let nibble = |c: u8| -> Result<u8, ParseColorError> {
            (c as char).to_digit(16).map(|d| d as u8).ok_or_else(err)
        };
        let byte_at = |i: usize| -> Result<u8, ParseColorError> {
            let b = hex.as_bytes();
            Ok(nibble(b[i])? << 4 | nibble(b[i + 1])?)
        };

        match hex.len() {
            3 => {
                let b = hex.as_bytes();
                let expand = |c: u8| -> Result<u8, ParseColorError> {
                    let n = nibble(c)?;
                    Ok(n << 4 | n)
                };
                Ok(Self::opaque(expand(b[0])?, expand(b[1])?, expand(b[2])?))
            }
            6 => Ok(Self::opaque(byte_at(0)?, byte_at(2)?, byte_at(4)?)),
            8 => Ok(Self::new(
                byte_at(0)?,
                byte_at(2)?,
                byte_at(4)?,
                byte_at(6)?,
            )),
            _ => Err(err()),
        }
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}
