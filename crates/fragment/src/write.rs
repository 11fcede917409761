//! Fragment source emission, the producer side of [`crate::Fragment`].

use std::fmt::Write as _;

use implreg_registry::Contribution;

const HEADER: &str = "(function() {var implementors = {};\n";
const FOOTER: &str = "})()\n";

pub(crate) fn write_source(contributions: &[Contribution]) -> String {
	let mut out = String::from(HEADER);
	for contribution in contributions {
		out.push_str("implementors[");
		push_literal(&mut out, contribution.bucket.as_str(), '\'');
		out.push_str("] = [");
		for entry in &contribution.entries {
			push_literal(&mut out, entry.as_str(), '"');
			out.push(',');
		}
		out.push_str("];\n");
	}
	out.push_str(FOOTER);
	out
}

fn push_literal(out: &mut String, text: &str, quote: char) {
	out.push(quote);
	for ch in text.chars() {
		match ch {
			'\\' => out.push_str("\\\\"),
			'\n' => out.push_str("\\n"),
			'\r' => out.push_str("\\r"),
			'\t' => out.push_str("\\t"),
			c if c == quote => {
				out.push('\\');
				out.push(c);
			}
			c if c.is_control() => {
				let _ = write!(out, "\\u{:04x}", c as u32);
			}
			c => out.push(c),
		}
	}
	out.push(quote);
}
