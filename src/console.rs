use std::io::{self, BufRead, Write};

use thiserror::Error;

use crate::{
    console::reader::Tokens,
    table::{HashTable, Insert, Lookup},
};
pub mod reader;

// Longest key in bytes accepted from the console; longer words are split.
pub const MAX_KEY_LEN: usize = 199;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOptions {
    // Ends the load phase
    pub load_sentinel: String,
    // Ends the query phase and the session
    pub query_sentinel: String,
    // Prints the whole table in either phase
    pub dump_command: String,
    pub max_key_len: usize,
}

impl Default for ConsoleOptions {
    fn default() -> ConsoleOptions {
        ConsoleOptions {
            load_sentinel: String::from("exit"),
            query_sentinel: String::from("done"),
            dump_command: String::from("print"),
            max_key_len: MAX_KEY_LEN,
        }
    }
}

impl ConsoleOptions {
    // Command words are compared against bounded tokens, so each one has to
    // survive tokenizing intact or it could never be entered.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.max_key_len == 0 {
            return Err(OptionsError::ZeroKeyLen);
        }
        for (name, word) in [
            ("load sentinel", &self.load_sentinel),
            ("query sentinel", &self.query_sentinel),
            ("dump command", &self.dump_command),
        ] {
            if word.is_empty() || word.contains(|c: char| c.is_ascii_whitespace()) {
                return Err(OptionsError::NotAWord { name, word: word.clone() });
            }
            if word.len() > self.max_key_len {
                return Err(OptionsError::WordTooLong {
                    name,
                    word: word.clone(),
                    max_key_len: self.max_key_len,
                });
            }
        }
        Ok(())
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OptionsError {
    #[error("max key length must be at least 1")]
    ZeroKeyLen,
    #[error("{name} {word:?} must be a single non-empty word")]
    NotAWord { name: &'static str, word: String },
    #[error("{name} {word:?} is longer than the {max_key_len} byte key limit")]
    WordTooLong {
        name: &'static str,
        word: String,
        max_key_len: usize,
    },
}

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("invalid console options: {0}")]
    Options(#[from] OptionsError),
    #[error("console i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Load,
    Query,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub inserted: usize,
    pub duplicates: usize,
    pub errors: usize,
    pub found: usize,
    pub missed: usize,
    pub dumps: usize,
}

// Drives a table from a token stream: inserts until the load sentinel,
// then lookups until the query sentinel.
pub struct Session<'a, W> {
    table: &'a mut HashTable,
    out: W,
    options: &'a ConsoleOptions,
    summary: SessionSummary,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(table: &'a mut HashTable, out: W, options: &'a ConsoleOptions) -> Session<'a, W> {
        Session {
            table,
            out,
            options,
            summary: SessionSummary::default(),
        }
    }

    pub fn run<R: BufRead>(mut self, input: R) -> Result<SessionSummary, ConsoleError> {
        self.options.validate()?;
        let mut tokens = Tokens::new(input, self.options.max_key_len);
        for phase in [Phase::Load, Phase::Query] {
            let span = tracing::info_span!("phase", ?phase);
            let _enter = span.enter();
            loop {
                self.prompt(phase)?;
                let Some(token) = tokens.next() else {
                    tracing::info!("input closed");
                    self.out.flush()?;
                    return Ok(self.summary);
                };
                if !self.dispatch(phase, &token?)? {
                    break;
                }
            }
        }
        self.out.flush()?;
        Ok(self.summary)
    }

    fn prompt(&mut self, phase: Phase) -> io::Result<()> {
        match phase {
            Phase::Load => writeln!(
                self.out,
                "Enter data to be added to hash table or ({}) when done",
                self.options.load_sentinel
            )?,
            Phase::Query => writeln!(
                self.out,
                "Enter data to find, {} when complete",
                self.options.query_sentinel
            )?,
        }
        self.out.flush()
    }

    // Returns false once the phase's sentinel is read.
    fn dispatch(&mut self, phase: Phase, token: &str) -> io::Result<bool> {
        let sentinel = match phase {
            Phase::Load => &self.options.load_sentinel,
            Phase::Query => &self.options.query_sentinel,
        };
        if token == sentinel {
            return Ok(false);
        }
        if token == self.options.dump_command {
            self.summary.dumps += 1;
            write!(self.out, "{}", self.table)?;
            return Ok(true);
        }
        match phase {
            Phase::Load => self.load(token)?,
            Phase::Query => self.query(token)?,
        }
        Ok(true)
    }

    fn load(&mut self, key: &str) -> io::Result<()> {
        match self.table.insert(key) {
            Ok(Insert::Inserted(bucket)) => {
                self.summary.inserted += 1;
                writeln!(self.out, "{key} added to hash table at {bucket}")
            }
            Ok(Insert::Duplicate) => {
                self.summary.duplicates += 1;
                writeln!(self.out, "{key} already in hash table")
            }
            Err(e) => {
                self.summary.errors += 1;
                tracing::error!(key, "insert failed: {e}");
                writeln!(self.out, "Error putting into hash table: {e}")
            }
        }
    }

    fn query(&mut self, key: &str) -> io::Result<()> {
        match self.table.lookup(key) {
            Lookup::Found { bucket, .. } => {
                self.summary.found += 1;
                writeln!(self.out, "{key} found in hash table at {bucket}")
            }
            Lookup::NotFound { .. } => {
                self.summary.missed += 1;
                writeln!(self.out, "{key} not found in hash table")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::console::*;
    use std::io::Cursor;

    fn transcript(table: &mut HashTable, options: &ConsoleOptions, input: &str) -> (String, SessionSummary) {
        let mut out = Vec::new();
        let summary = Session::new(table, &mut out, options)
            .run(Cursor::new(input))
            .unwrap();
        (String::from_utf8(out).unwrap(), summary)
    }

    #[test]
    fn load_then_query() {
        let mut table = HashTable::new();
        let options = ConsoleOptions::default();
        let (out, summary) = transcript(&mut table, &options, "cat\ncat\ndog\nexit\ncat\nbird\ndone\n");
        let load = "Enter data to be added to hash table or (exit) when done\n";
        let query = "Enter data to find, done when complete\n";
        let exp = [
            load,
            "cat added to hash table at 5\n",
            load,
            "cat already in hash table\n",
            load,
            "dog added to hash table at 3\n",
            load,
            query,
            "cat found in hash table at 5\n",
            query,
            "bird not found in hash table\n",
            query,
        ]
        .concat();
        assert_eq!(out, exp);
        assert_eq!(
            summary,
            SessionSummary {
                inserted: 2,
                duplicates: 1,
                found: 1,
                missed: 1,
                ..Default::default()
            }
        );
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn print_in_both_phases() {
        let mut table = HashTable::with_buckets(2).unwrap();
        let options = ConsoleOptions::default();
        let (out, summary) = transcript(&mut table, &options, "print exit print done");
        let empty = "\n# 0 - (Empty)\n# 1 - (Empty)\n\n";
        assert_eq!(out.matches(empty).count(), 2);
        assert_eq!(summary.dumps, 2);
        assert!(table.is_empty());
    }

    #[test]
    fn query_sentinel_is_a_key_while_loading() {
        let mut table = HashTable::new();
        let options = ConsoleOptions::default();
        let (out, _) = transcript(&mut table, &options, "done exit done");
        assert!(out.contains("done added to hash table at 5\n"));
        assert!(table.contains("done"));
    }

    #[test]
    fn end_of_input_ends_session() {
        let mut table = HashTable::new();
        let options = ConsoleOptions::default();
        let (out, summary) = transcript(&mut table, &options, "cat\n");
        assert!(out.ends_with("cat added to hash table at 5\nEnter data to be added to hash table or (exit) when done\n"));
        assert_eq!(summary.inserted, 1);
    }

    fn short_limit_options() -> ConsoleOptions {
        ConsoleOptions {
            load_sentinel: String::from("q"),
            query_sentinel: String::from("qq"),
            dump_command: String::from("p"),
            max_key_len: 3,
        }
    }

    #[test]
    fn long_input_is_bounded() {
        let mut table = HashTable::new();
        let options = short_limit_options();
        let (_, summary) = transcript(&mut table, &options, "catdog q cat qq");
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.found, 1);
        assert!(table.contains("cat"));
        assert!(table.contains("dog"));
    }

    #[test]
    fn commands_shorter_than_limit_still_match() {
        let mut table = HashTable::new();
        let options = short_limit_options();
        // "qqq" is a key; only the exact sentinel ends the phase
        let (out, summary) = transcript(&mut table, &options, "qqq p q");
        assert_eq!(summary.inserted, 1);
        assert_eq!(summary.dumps, 1);
        assert!(out.contains("Enter data to find, qq when complete\n"));
    }

    #[test]
    fn sentinel_longer_than_limit_is_rejected() {
        let options = ConsoleOptions {
            max_key_len: 3,
            ..Default::default()
        };
        assert_eq!(
            options.validate(),
            Err(OptionsError::WordTooLong {
                name: "load sentinel",
                word: String::from("exit"),
                max_key_len: 3,
            })
        );

        let mut table = HashTable::new();
        let mut out = Vec::new();
        let result = Session::new(&mut table, &mut out, &options).run(Cursor::new("catdog exit"));
        assert!(matches!(
            result,
            Err(ConsoleError::Options(OptionsError::WordTooLong { .. }))
        ));
        assert!(out.is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn dump_command_longer_than_limit_is_rejected() {
        let options = ConsoleOptions {
            max_key_len: 4,
            ..Default::default()
        };
        assert!(matches!(
            options.validate(),
            Err(OptionsError::WordTooLong { name: "dump command", .. })
        ));
    }

    #[test]
    fn bad_command_words_are_rejected() {
        let zero = ConsoleOptions {
            max_key_len: 0,
            ..Default::default()
        };
        assert_eq!(zero.validate(), Err(OptionsError::ZeroKeyLen));

        let spaced = ConsoleOptions {
            query_sentinel: String::from("all done"),
            ..Default::default()
        };
        assert!(matches!(
            spaced.validate(),
            Err(OptionsError::NotAWord { name: "query sentinel", .. })
        ));
        assert_eq!(ConsoleOptions::default().validate(), Ok(()));
    }

    #[test]
    fn multibyte_keys_stay_within_byte_limit() {
        let mut table = HashTable::new();
        let options = ConsoleOptions::default();
        let input = "é".repeat(199) + " exit";
        let (_, summary) = transcript(&mut table, &options, &input);
        // two identical 99-char halves, then the last 'é'
        assert_eq!(summary.inserted, 2);
        assert_eq!(summary.duplicates, 1);
        assert!(table
            .dump()
            .flat_map(|(_, values)| values)
            .all(|value| value.len() <= MAX_KEY_LEN));
        assert!(table.contains(&"é".repeat(99)));
        assert!(table.contains("é"));
    }

    #[test]
    fn custom_sentinels() {
        let mut table = HashTable::new();
        let options = ConsoleOptions {
            load_sentinel: String::from("q"),
            query_sentinel: String::from("quit"),
            dump_command: String::from("show"),
            ..Default::default()
        };
        let (out, summary) = transcript(&mut table, &options, "exit q exit show quit");
        assert!(out.starts_with("Enter data to be added to hash table or (q) when done\n"));
        assert!(out.contains("Enter data to find, quit when complete\n"));
        assert!(out.contains("exit found in hash table at 3\n"));
        assert_eq!(summary.dumps, 1);
    }
}
