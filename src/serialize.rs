//! Legacy map-file format: a whitespace-separated token stream with `{` /
//! `}` object delimiters, quoted strings and packed-u32 colors.
//!
//! Field order and the shape type tags (`"fh"`, `"sl"`, `"cr"`, `"rct"`,
//! `"txt"`, `"inf"`) are frozen; old map files must keep loading.

use std::io::{Read, Write};

use egui::Color32;
use thiserror::Error;

/// Errors that can occur while reading or writing the map token stream
#[derive(Debug, Error)]
pub enum SerializeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("expected {expected}, found {found:?}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },

    #[error("malformed number {0:?}")]
    InvalidNumber(String),

    #[error("unrecognized shape type tag {0:?}")]
    UnknownShapeTag(String),

    #[error("map file version {0} is newer than this build understands")]
    UnsupportedVersion(u32),
}

/// Writes the token stream. One value per call, fixed order per type.
pub struct MapDataSerializer<W: Write> {
    out: W,
}

impl<W: Write> MapDataSerializer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn token(&mut self, t: &str) -> Result<(), SerializeError> {
        self.out.write_all(t.as_bytes())?;
        self.out.write_all(b"\n")?;
        Ok(())
    }

    pub fn start_object(&mut self) -> Result<(), SerializeError> {
        self.token("{")
    }

    pub fn end_object(&mut self) -> Result<(), SerializeError> {
        self.token("}")
    }

    pub fn string(&mut self, v: &str) -> Result<(), SerializeError> {
        let mut quoted = String::with_capacity(v.len() + 2);
        quoted.push('"');
        for c in v.chars() {
            match c {
                '"' => quoted.push_str("\\\""),
                '\\' => quoted.push_str("\\\\"),
                '\n' => quoted.push_str("\\n"),
                _ => quoted.push(c),
            }
        }
        quoted.push('"');
        self.token(&quoted)
    }

    pub fn f32(&mut self, v: f32) -> Result<(), SerializeError> {
        self.token(&format!("{v}"))
    }

    pub fn u32(&mut self, v: u32) -> Result<(), SerializeError> {
        self.token(&format!("{v}"))
    }

    pub fn bool(&mut self, v: bool) -> Result<(), SerializeError> {
        self.token(if v { "1" } else { "0" })
    }

    /// Colors are packed into one `0xAARRGGBB` token.
    pub fn color(&mut self, v: Color32) -> Result<(), SerializeError> {
        let packed = (u32::from(v.a()) << 24)
            | (u32::from(v.r()) << 16)
            | (u32::from(v.g()) << 8)
            | u32::from(v.b());
        self.u32(packed)
    }
}

/// One lexed element of the stream
#[derive(Debug, Clone, PartialEq)]
enum StreamToken {
    Open,
    Close,
    Word(String),
    Quoted(String),
}

impl StreamToken {
    fn describe(&self) -> String {
        match self {
            StreamToken::Open => "{".to_owned(),
            StreamToken::Close => "}".to_owned(),
            StreamToken::Word(w) => w.clone(),
            StreamToken::Quoted(q) => format!("\"{q}\""),
        }
    }
}

/// Reads the token stream written by [`MapDataSerializer`].
///
/// The whole input is lexed up front; map files are small and this keeps
/// the per-field readers trivial.
pub struct MapDataDeserializer {
    tokens: Vec<StreamToken>,
    cursor: usize,
}

impl MapDataDeserializer {
    pub fn new<R: Read>(mut input: R) -> Result<Self, SerializeError> {
        let mut raw = String::new();
        input.read_to_string(&mut raw)?;
        Ok(Self {
            tokens: tokenize(&raw)?,
            cursor: 0,
        })
    }

    fn next_token(&mut self) -> Result<&StreamToken, SerializeError> {
        let t = self
            .tokens
            .get(self.cursor)
            .ok_or(SerializeError::UnexpectedEof)?;
        self.cursor += 1;
        Ok(t)
    }

    fn word(&mut self, expected: &'static str) -> Result<&str, SerializeError> {
        match self.next_token()? {
            StreamToken::Word(w) => Ok(w),
            other => Err(SerializeError::UnexpectedToken {
                expected,
                found: other.describe(),
            }),
        }
    }

    pub fn expect_start_object(&mut self) -> Result<(), SerializeError> {
        match self.next_token()? {
            StreamToken::Open => Ok(()),
            other => Err(SerializeError::UnexpectedToken {
                expected: "{",
                found: other.describe(),
            }),
        }
    }

    pub fn expect_end_object(&mut self) -> Result<(), SerializeError> {
        match self.next_token()? {
            StreamToken::Close => Ok(()),
            other => Err(SerializeError::UnexpectedToken {
                expected: "}",
                found: other.describe(),
            }),
        }
    }

    pub fn string(&mut self) -> Result<String, SerializeError> {
        match self.next_token()? {
            StreamToken::Quoted(q) => Ok(q.clone()),
            other => Err(SerializeError::UnexpectedToken {
                expected: "string",
                found: other.describe(),
            }),
        }
    }

    pub fn f32(&mut self) -> Result<f32, SerializeError> {
        let w = self.word("number")?;
        w.parse()
            .map_err(|_| SerializeError::InvalidNumber(w.to_owned()))
    }

    pub fn u32(&mut self) -> Result<u32, SerializeError> {
        let w = self.word("number")?;
        w.parse()
            .map_err(|_| SerializeError::InvalidNumber(w.to_owned()))
    }

    pub fn bool(&mut self) -> Result<bool, SerializeError> {
        Ok(self.u32()? != 0)
    }

    pub fn color(&mut self) -> Result<Color32, SerializeError> {
        let packed = self.u32()?;
        Ok(Color32::from_rgba_premultiplied(
            ((packed >> 16) & 0xff) as u8,
            ((packed >> 8) & 0xff) as u8,
            (packed & 0xff) as u8,
            ((packed >> 24) & 0xff) as u8,
        ))
    }
}

fn tokenize(raw: &str) -> Result<Vec<StreamToken>, SerializeError> {
    let mut tokens = Vec::new();
    let mut chars = raw.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c == '"' {
            chars.next();
            let mut body = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some('n') => body.push('\n'),
                        Some(escaped) => body.push(escaped),
                        None => return Err(SerializeError::UnexpectedEof),
                    },
                    Some(other) => body.push(other),
                    None => return Err(SerializeError::UnexpectedEof),
                }
            }
            tokens.push(StreamToken::Quoted(body));
        } else {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                word.push(c);
                chars.next();
            }
            tokens.push(match word.as_str() {
                "{" => StreamToken::Open,
                "}" => StreamToken::Close,
                _ => StreamToken::Word(word),
            });
        }
    }

    Ok(tokens)
}
