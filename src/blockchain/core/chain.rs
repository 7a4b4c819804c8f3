use crate::error::{ChainError, Result};
use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufRead, BufReader, Read, Write};
use std::path::Path;

/// Addresses are displayed in hex.
pub type Address = u64;
/// Amounts are displayed in decimal.
pub type Amount = u64;
pub type Digest = u64;

/// The address every billcoin is minted from. It can send any amount and
/// can never receive.
pub const SOURCE_ADDRESS: Address = 0;

/// Typed at the "from" prompt to stop building a chain.
pub const STOP_MARKER: &str = "x";

/// A block carrying exactly one transaction.
///
/// Field order feeds the derived `Hash`, and so every `prev_hash` in
/// existing chain files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Block {
    pub to_addr: Address,
    pub from_addr: Address,
    pub amount: Amount,
    pub prev_hash: Digest,
}

impl Block {
    pub fn new(from_addr: Address, to_addr: Address, amount: Amount, prev_hash: Digest) -> Self {
        Block {
            to_addr,
            from_addr,
            amount,
            prev_hash,
        }
    }

    pub fn hash(&self) -> Digest {
        let mut hasher = DefaultHasher::new();
        Hash::hash(self, &mut hasher);
        hasher.finish()
    }

    /// Human-readable line for block number `index`.
    pub fn describe(&self, index: usize) -> String {
        format!(
            "Block: {}, {:#016x} sent {} billcoins to {:#016x} (Prev Hash: {:#016x})",
            index, self.from_addr, self.amount, self.to_addr, self.prev_hash
        )
    }
}

/// Append a block linked to the last block of `chain` (or to 0 for the first).
pub fn append_block(chain: &mut Vec<Block>, from_addr: Address, to_addr: Address, amount: Amount) {
    let prev_hash = chain.last().map_or(0, Block::hash);
    chain.push(Block::new(from_addr, to_addr, amount, prev_hash));
}

/// Parse a hex number with an optional `0x` prefix.
pub fn parse_hex(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u64::from_str_radix(digits, 16).map_err(|e| format!("invalid hex value {:?}: {}", s, e))
}

pub fn parse_decimal(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    s.parse::<u64>()
        .map_err(|e| format!("invalid decimal value {:?}: {}", s, e))
}

/// Parse a chain in the CSV layout `index,from,amount,to,prev_hash`.
///
/// The index column is informational and not checked.
pub fn parse_blockchain<R: Read>(reader: R) -> Result<Vec<Block>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut blocks = Vec::new();
    for (j, record) in rdr.records().enumerate() {
        let record = record?;
        // 0-based file line; blank lines are skipped by the reader but still counted
        let line = record
            .position()
            .map_or(j, |pos| pos.line().saturating_sub(1) as usize);
        if record.len() != 5 {
            return Err(ChainError::parse(
                line,
                format!("expected 5 fields, found {}", record.len()),
            ));
        }

        let field = |idx: usize, parse: fn(&str) -> std::result::Result<u64, String>| {
            parse(&record[idx]).map_err(|e| ChainError::parse(line, e))
        };

        blocks.push(Block {
            from_addr: field(1, parse_hex)?,
            amount: field(2, parse_decimal)?,
            to_addr: field(3, parse_hex)?,
            prev_hash: field(4, parse_hex)?,
        });
    }

    tracing::debug!(blocks = blocks.len(), "parsed blockchain");
    Ok(blocks)
}

pub fn read_blockchain_file<P: AsRef<Path>>(path: P) -> Result<Vec<Block>> {
    let file = File::open(path.as_ref()).map_err(|e| {
        ChainError::IoError(std::io::Error::new(
            e.kind(),
            format!("{}: {}", path.as_ref().display(), e),
        ))
    })?;
    parse_blockchain(BufReader::new(file))
}

/// Render the chain in the file layout, one line per block.
pub fn to_csv(chain: &[Block]) -> Result<String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    for (j, b) in chain.iter().enumerate() {
        wtr.write_record([
            j.to_string(),
            format!("{:#016x}", b.from_addr),
            b.amount.to_string(),
            format!("{:#016x}", b.to_addr),
            format!("{:#016x}", b.prev_hash),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| ChainError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ChainError::InvalidBlock(e.to_string()))
}

pub fn pretty_print(chain: &[Block]) -> Vec<String> {
    chain
        .iter()
        .enumerate()
        .map(|(j, b)| b.describe(j))
        .collect()
}

fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> Result<Option<String>> {
    write!(output, "{} > ", label)?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

/// Read one block's data from `input`. Returns `None` when the user types
/// [`STOP_MARKER`] (or input ends) at the "from" prompt.
pub fn read_block_info<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prev_hash: Digest,
    block_num: usize,
) -> Result<Option<Block>> {
    let from = match prompt(input, output, "From address (hex)")? {
        Some(s) if s != STOP_MARKER => s,
        _ => return Ok(None),
    };
    let to = prompt(input, output, "To address (hex)")?
        .ok_or_else(|| ChainError::parse(block_num, "input ended before the to address"))?;
    let amount = prompt(input, output, "Amount")?
        .ok_or_else(|| ChainError::parse(block_num, "input ended before the amount"))?;

    Ok(Some(Block {
        to_addr: parse_hex(&to).map_err(|e| ChainError::parse(block_num, e))?,
        from_addr: parse_hex(&from).map_err(|e| ChainError::parse(block_num, e))?,
        amount: parse_decimal(&amount).map_err(|e| ChainError::parse(block_num, e))?,
        prev_hash,
    }))
}

/// Build a chain interactively. Blocks are linked but not verified.
pub fn make_blockchain<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> Result<Vec<Block>> {
    let mut chain: Vec<Block> = Vec::new();
    let mut prev_hash = 0;

    loop {
        writeln!(output, "Block Number: {}", chain.len())?;
        match read_block_info(input, output, prev_hash, chain.len())? {
            Some(block) => {
                prev_hash = block.hash();
                chain.push(block);
            }
            None => break,
        }
    }

    Ok(chain)
}
