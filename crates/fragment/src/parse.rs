//! Fragment source scanner.
//!
//! Only the assignment shape matters here:
//!
//! ```text
//! implementors['<bucket>'] = ["<entry>", "<entry>",];
//! ```
//!
//! Everything around the assignments (the wrapping closure, the hand-off to the page) is skipped.

use std::sync::LazyLock;

use implreg_registry::Contribution;
use regex::Regex;

use crate::error::FragmentError;

static ASSIGNMENT: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"\bimplementors\s*\[").expect("assignment pattern is valid"));

/// Parses every assignment in `source`, in source order.
pub(crate) fn parse_contributions(source: &str) -> Result<Vec<Contribution>, FragmentError> {
	let mut contributions = Vec::new();
	let mut search_from = 0;

	while let Some(head) = ASSIGNMENT.find_at(source, search_from) {
		let mut cur = Cursor::new(source, head.end());

		cur.skip_ws();
		let bucket = cur.string()?;
		cur.skip_ws();
		cur.expect(']', "`]` after bucket key")?;
		cur.skip_ws();
		cur.expect('=', "`=`")?;
		cur.skip_ws();
		cur.expect('[', "`[` opening the entry list")?;

		let mut entries = Vec::new();
		loop {
			cur.skip_ws();
			if cur.eat(']') {
				break;
			}
			entries.push(cur.string()?);
			cur.skip_ws();
			if !cur.eat(',') {
				cur.expect(']', "`,` or `]` in entry list")?;
				break;
			}
		}

		contributions.push(Contribution::new(bucket, entries));
		search_from = cur.pos;
	}

	if contributions.is_empty() {
		return Err(FragmentError::NoAssignments);
	}
	Ok(contributions)
}

struct Cursor<'a> {
	src: &'a str,
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn new(src: &'a str, pos: usize) -> Self {
		Self { src, pos }
	}

	fn rest(&self) -> &'a str {
		&self.src[self.pos..]
	}

	fn peek(&self) -> Option<char> {
		self.rest().chars().next()
	}

	fn bump(&mut self) -> Option<char> {
		let ch = self.peek()?;
		self.pos += ch.len_utf8();
		Some(ch)
	}

	fn skip_ws(&mut self) {
		let trimmed = self.rest().trim_start();
		self.pos = self.src.len() - trimmed.len();
	}

	fn eat(&mut self, ch: char) -> bool {
		if self.peek() == Some(ch) {
			self.pos += ch.len_utf8();
			true
		} else {
			false
		}
	}

	fn expect(&mut self, ch: char, expected: &'static str) -> Result<(), FragmentError> {
		if self.eat(ch) {
			Ok(())
		} else {
			Err(FragmentError::Expected {
				expected,
				offset: self.pos,
			})
		}
	}

	/// Reads a single- or double-quoted literal and resolves its escapes.
	fn string(&mut self) -> Result<String, FragmentError> {
		let start = self.pos;
		let quote = match self.peek() {
			Some(q @ ('\'' | '"')) => q,
			_ => {
				return Err(FragmentError::Expected {
					expected: "string literal",
					offset: start,
				});
			}
		};
		self.pos += 1;

		let mut out = String::new();
		loop {
			let escape_at = self.pos;
			match self.bump() {
				None | Some('\n' | '\r') => {
					return Err(FragmentError::UnterminatedString { offset: start });
				}
				Some(ch) if ch == quote => return Ok(out),
				Some('\\') => self.escape(escape_at, &mut out)?,
				Some(ch) => out.push(ch),
			}
		}
	}

	fn escape(&mut self, at: usize, out: &mut String) -> Result<(), FragmentError> {
		let invalid = FragmentError::InvalidEscape { offset: at };
		match self.bump().ok_or(FragmentError::UnterminatedString { offset: at })? {
			'n' => out.push('\n'),
			'r' => out.push('\r'),
			't' => out.push('\t'),
			'b' => out.push('\u{8}'),
			'f' => out.push('\u{c}'),
			'v' => out.push('\u{b}'),
			'0' => out.push('\0'),
			'x' => {
				let code = self.hex(2).ok_or(invalid.clone())?;
				out.push(char::from_u32(code).ok_or(invalid)?);
			}
			'u' => {
				let unit = self.code_unit().ok_or(invalid.clone())?;
				let ch = if (0xD800..0xDC00).contains(&unit) {
					// High surrogate; a `\uDC00`-`\uDFFF` partner must follow.
					if !self.rest().starts_with("\\u") {
						return Err(invalid);
					}
					self.pos += 2;
					let low = self.code_unit().ok_or(invalid.clone())?;
					if !(0xDC00..0xE000).contains(&low) {
						return Err(invalid);
					}
					char::from_u32(0x10000 + ((unit - 0xD800) << 10) + (low - 0xDC00))
				} else {
					char::from_u32(unit)
				};
				out.push(ch.ok_or(invalid)?);
			}
			// Line continuations.
			'\n' | '\u{2028}' | '\u{2029}' => {}
			'\r' => {
				self.eat('\n');
			}
			other => out.push(other),
		}
		Ok(())
	}

	/// `XXXX` or `{X...}` after `\u`.
	fn code_unit(&mut self) -> Option<u32> {
		if self.eat('{') {
			let len = self.rest().find('}')?;
			let code = u32::from_str_radix(&self.rest()[..len], 16).ok()?;
			self.pos += len + 1;
			Some(code)
		} else {
			self.hex(4)
		}
	}

	fn hex(&mut self, digits: usize) -> Option<u32> {
		let text = self.rest().get(..digits)?;
		if !text.bytes().all(|b| b.is_ascii_hexdigit()) {
			return None;
		}
		self.pos += digits;
		u32::from_str_radix(text, 16).ok()
	}
}
