/// Characters separating the words of a command string.
///
/// Quotes are separators rather than quoting: `tr 'a-z' 'A-Z'` yields
/// `["tr", "a-z", "A-Z"]`. Use a brace run to keep a delimiter inside a word.
pub const COMMAND_DELIMITERS: &[char] = &[' ', '"', '\''];

struct Parser<'a> {
	line: &'a str,
	delimiters: &'a [char],
	i: usize,
}

impl<'a> Parser<'a> {
	fn peek(&self) -> Option<char> {
		self.line[self.i ..].chars().next()
	}

	fn proceed_while<F>(&mut self, f: F) where F: Fn(char) -> bool {
		while let Some(c) = self.peek() {
			if !f(c) { break; }
			self.i += c.len_utf8();
		}
	}

	fn is_delimiter(&self, c: char) -> bool {
		self.delimiters.contains(&c)
	}

	fn skip_delimiters(&mut self) {
		let delimiters = self.delimiters;
		self.proceed_while(|c| delimiters.contains(&c));
	}

	fn at_end(&self) -> bool {
		self.i >= self.line.len()
	}

	/// Consumes a brace run starting at `{`, up to and including the matching `}`.
	/// Returns false when the line ends before the run is closed.
	fn read_brace_run(&mut self) -> bool {
		self.proceed_while(|c| c != '}');
		if self.peek() == Some('}') {
			self.i += 1;
			true
		} else {
			false
		}
	}

	/// Reads the word under the cursor. A word holding an unclosed brace run
	/// swallows the rest of the line and yields `None`.
	fn read_word(&mut self) -> Option<&'a str> {
		let orig = self.i;
		while let Some(c) = self.peek() {
			if self.is_delimiter(c) {
				break;
			}
			if c == '{' {
				if !self.read_brace_run() {
					return None;
				}
			} else {
				self.i += c.len_utf8();
			}
		}
		Some(&self.line[orig .. self.i])
	}
}

/// Splits `line` into an argument vector.
///
/// Runs of delimiters collapse, so no empty words are produced. A `{...}`
/// run is copied verbatim into its word, delimiters included. An unclosed
/// `{` drops its word and ends tokenization without an error.
pub fn tokenize(line: &str, delimiters: &[char]) -> Vec<String> {
	let mut parser = Parser { line: line, delimiters: delimiters, i: 0 };
	let mut words = vec![];
	loop {
		parser.skip_delimiters();
		if parser.at_end() {
			break;
		}
		match parser.read_word() {
			Some(word) => words.push(word.to_owned()),
			None => break,
		}
	}
	words
}

/// Splits a command string with [`COMMAND_DELIMITERS`].
pub fn split_command(line: &str) -> Vec<String> {
	tokenize(line, COMMAND_DELIMITERS)
}
