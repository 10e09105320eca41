use std::fmt::Display;

use libm15::word::{Word, WordExt};

use crate::pass_two::Assembly;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Header {
        code_length: usize,
        data_length: usize,
    },
    Word {
        address: usize,
        word: Word,
    },
    Entry {
        name: String,
        address: usize,
    },
    External {
        name: String,
        address: usize,
    },
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Header {
                code_length,
                data_length,
            } => write!(f, "{:>4} {}", code_length, data_length),
            Record::Word { address, word } => write!(f, "{:0>4} {}", address, word.as_octal()),
            Record::Entry { name, address } => write!(f, "{} {}", name, address),
            Record::External { name, address } => write!(f, "{} {:0>4}", name, address),
        }
    }
}

fn render(records: &[Record]) -> String {
    records.iter().map(|r| format!("{}\n", r)).collect()
}

impl Assembly {
    /// Header, then every code word, then every data word after the code.
    pub fn object_records(&self) -> Vec<Record> {
        let header = Record::Header {
            code_length: self.code_length(),
            data_length: self.data_length(),
        };
        let code = self.code.iter().map(|w| Record::Word {
            address: w.address,
            word: w.word,
        });
        let data = self.data.iter().map(|d| Record::Word {
            address: self.data_address(d),
            word: d.word,
        });

        std::iter::once(header).chain(code).chain(data).collect()
    }

    pub fn entry_records(&self) -> Vec<Record> {
        self.symbols
            .entries()
            .map(|s| Record::Entry {
                name: s.name.clone(),
                address: s.address,
            })
            .collect()
    }

    pub fn external_records(&self) -> Vec<Record> {
        self.externals
            .iter()
            .map(|e| Record::External {
                name: e.name.clone(),
                address: e.address,
            })
            .collect()
    }

    pub fn object_file(&self) -> String {
        render(&self.object_records())
    }

    /// `None` when nothing is exported.
    pub fn entries_file(&self) -> Option<String> {
        let records = self.entry_records();
        (!records.is_empty()).then(|| render(&records))
    }

    /// `None` when nothing external is referenced.
    pub fn externals_file(&self) -> Option<String> {
        let records = self.external_records();
        (!records.is_empty()).then(|| render(&records))
    }
}
