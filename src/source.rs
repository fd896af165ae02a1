/// A cursor over expression text.
///
/// Positions are byte offsets so they can be handed straight to regex matching
/// and reported back in errors.
#[derive(Debug, Clone)]
pub struct Source<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> Source<'a> {
    pub fn new(text: &'a str) -> Self {
        Source { text, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_eof(&self) -> bool {
        self.position >= self.text.len()
    }

    /// Unconsumed text from the cursor onwards.
    pub fn rest(&self) -> &'a str {
        &self.text[self.position..]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    pub fn pop(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += ch.len_utf8();
        Some(ch)
    }

    /// Advance by `len` bytes. `len` must land on a char boundary.
    pub fn skip(&mut self, len: usize) {
        self.position = (self.position + len).min(self.text.len());
    }

    pub fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.pop();
            } else {
                break;
            }
        }
    }
}
