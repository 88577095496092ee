use std::{
    collections::VecDeque,
    io::{self, BufRead},
};

// Splits a line into whitespace separated words, cutting any word longer than
// `max_len` bytes into consecutive pieces of at most `max_len` bytes. Cuts land
// on char boundaries; a piece always holds at least one char, so a limit below
// a char's encoded width yields that char alone.
pub fn split_bounded(line: &str, max_len: usize) -> Vec<String> {
    let max_len = max_len.max(1);
    let mut tokens = vec![];
    for word in line.split_ascii_whitespace() {
        let mut rest = word;
        while !rest.is_empty() {
            let mut end = max_len.min(rest.len());
            while !rest.is_char_boundary(end) {
                end -= 1;
            }
            if end == 0 {
                end = rest.chars().next().map_or(rest.len(), char::len_utf8);
            }
            let (head, tail) = rest.split_at(end);
            tokens.push(head.to_string());
            rest = tail;
        }
    }
    tokens
}

// Pulls bounded tokens out of a line oriented reader, one at a time.
pub struct Tokens<R> {
    input: R,
    buffer: String,
    pending: VecDeque<String>,
    max_len: usize,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(input: R, max_len: usize) -> Tokens<R> {
        Tokens {
            input,
            buffer: String::new(),
            pending: VecDeque::new(),
            max_len,
        }
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pending.is_empty() {
            self.buffer.clear();
            match self.input.read_line(&mut self.buffer) {
                Ok(0) => return None,
                Ok(_) => self
                    .pending
                    .extend(split_bounded(&self.buffer, self.max_len)),
                Err(e) => return Some(Err(e)),
            }
        }
        self.pending.pop_front().map(Ok)
    }
}
