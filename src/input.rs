use super::EPSILON;
use std::fmt;

/// A line of a string list, split into the label printed back and the string to test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestLine {
	/// The trimmed line.
	pub line: String,
	/// The string handed to the simulator.
	pub input: String,
}

impl TestLine {
	/// Normalizes a line of a string list.
	///
	/// A leading all-digit token followed by more text is a label and is dropped from
	/// the input. A lone `&` stands for the empty string, as does an empty line.
	pub fn parse(line: &str) -> Self {
		let line = line.trim();
		let input = match line.split_once(char::is_whitespace) {
			Some((label, rest)) if label.chars().all(|c| c.is_ascii_digit()) => rest.trim(),
			_ => line,
		};
		let input = if is_empty_marker(input) { "" } else { input };

		Self {
			line: line.to_owned(),
			input: input.to_owned(),
		}
	}

	/// Formats the result line for this input.
	pub fn report(&self, accepted: bool) -> Report<'_> {
		Report {
			line: &self.line,
			accepted,
		}
	}
}

fn is_empty_marker(input: &str) -> bool {
	let mut chars = input.chars();
	chars.next() == Some(EPSILON) && chars.next().is_none()
}

/// Result line `<line> --- Accepted` or `<line> --- Rejected`.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
	line: &'a str,
	accepted: bool,
}

impl fmt::Display for Report<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let verdict = if self.accepted { "Accepted" } else { "Rejected" };
		write!(f, "{} --- {}", self.line, verdict)
	}
}
