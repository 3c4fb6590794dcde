//! Plain-text micro-parser.

use crate::block::Block;

/// Split a plain string into word, space and special-symbol blocks.
///
/// Alphanumeric runs become words, whitespace becomes single space blocks,
/// and every other character becomes a special symbol. This is the only
/// "parsing" the model does itself; it is reused for header-title
/// flattening and for deriving link-label blocks, both of which operate on
/// program-generated strings, never on raw untrusted markup.
#[must_use]
pub fn parse_plain_text(text: &str) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            if !word.is_empty() {
                blocks.push(Block::word(std::mem::take(&mut word)));
            }
            if c.is_whitespace() {
                blocks.push(Block::space());
            } else {
                blocks.push(Block::symbol(c));
            }
        }
    }
    if !word.is_empty() {
        blocks.push(Block::word(word));
    }
    blocks
}
