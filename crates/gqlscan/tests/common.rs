#![allow(missing_docs)]

use std::fmt::Write;

pub const HERO: &str = r#"
query Hero($episode: Episode = JEDI, $withFriends: Boolean!) {
  hero(episode: $episode) {
    name
    friends @include(if: $withFriends) {
      ... on Droid { primaryFunction }
    }
  }
}
"#;

pub const CARD: &str = r#"
fragment Card on Product @cached(ttl: 60) {
  id
  price: cost(currency: USD, round: 2.50e0)
  tags(first: 3, filter: {kind: ["a", """b"""], active: true, note: null})
  ...Meta
}
"#;

/// One line per token: level, kind and raw text when there is any.
pub fn render_tokens(input: &str) -> String {
    let mut out = String::new();
    let result = gqlscan::scan_all(input.as_bytes(), |c| {
        write!(out, "{} {:?}", c.level(), c.token()).unwrap();
        if !c.value().is_empty() {
            write!(out, " {:?}", String::from_utf8_lossy(c.value())).unwrap();
        }
        out.push('\n');
    });
    if let Err(err) = result {
        writeln!(out, "error: {err}").unwrap();
    }
    out
}

pub fn render_errors(inputs: &[&str]) -> String {
    let mut out = String::new();
    for input in inputs {
        match gqlscan::scan_all(input.as_bytes(), |_| {}) {
            Ok(()) => writeln!(out, "{input:?} => ok").unwrap(),
            Err(err) => writeln!(out, "{input:?} => {err}").unwrap(),
        }
    }
    out
}

/// Interpreted content of every string token, decoded through a small
/// buffer.
pub fn render_strings(input: &str) -> String {
    let mut out = String::new();
    gqlscan::scan_all(input.as_bytes(), |c| {
        if !c.token().is_string() {
            return;
        }
        let mut decoded = Vec::new();
        c.scan_interpreted(&mut [0; 3], |chunk| {
            decoded.extend_from_slice(chunk);
            false
        });
        writeln!(
            out,
            "{:?} => {:?}",
            c.token(),
            String::from_utf8_lossy(&decoded)
        )
        .unwrap();
    })
    .unwrap();
    out
}
