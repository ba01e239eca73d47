//! Word-wise Soundex encoding.
//!
//! Replaces every alphabetic word with its 4-character Soundex code and
//! drops everything else; codes are joined by single spaces. Running before
//! tokenization, this turns e.g. `"Robert meets Rupert"` into
//! `"R163 M320 R163"`, so phonetically close words compare equal.

/// Map a consonant to its Soundex digit, `0` for vowels and ignorables.
fn code(b: u8) -> u8 {
    match b.to_ascii_lowercase() {
        b'b' | b'f' | b'p' | b'v' => b'1',
        b'c' | b'g' | b'j' | b'k' | b'q' | b's' | b'x' | b'z' => b'2',
        b'd' | b't' => b'3',
        b'l' => b'4',
        b'm' | b'n' => b'5',
        b'r' => b'6',
        _ => b'0',
    }
}

/// Soundex code of one word. Expects `word` to be non-empty ASCII letters.
fn encode_word(word: &[u8]) -> [u8; 4] {
    let mut out = [b'0'; 4];
    out[0] = word[0].to_ascii_uppercase();

    let mut n = 1;
    let mut prev = code(word[0]);
    for &b in &word[1..] {
        let c = code(b);
        // 'h' and 'w' are transparent: they do not reset the run of a
        // repeated digit. Vowels do.
        if matches!(b.to_ascii_lowercase(), b'h' | b'w') {
            continue;
        }
        if c != b'0' && c != prev {
            out[n] = c;
            n += 1;
            if n == 4 {
                break;
            }
        }
        prev = c;
    }
    out
}

/// Encode all words in `bytes`, joining the codes with single spaces.
pub fn soundex_encode(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut word_start = None;
    let mut push = |out: &mut Vec<u8>, word: &[u8]| {
        if !out.is_empty() {
            out.push(b' ');
        }
        out.extend_from_slice(&encode_word(word));
    };
    for (i, &b) in bytes.iter().enumerate() {
        if b.is_ascii_alphabetic() {
            if word_start.is_none() {
                word_start = Some(i);
            }
        } else if let Some(s) = word_start.take() {
            push(&mut out, &bytes[s..i]);
        }
    }
    if let Some(s) = word_start {
        push(&mut out, &bytes[s..]);
    }
    out
}
