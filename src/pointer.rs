/*!
JSON Pointer (RFC 6901) and wildcard-path parsing, shared by [`crate::tape`]
and [`crate::ondemand`] (spec §4.8 `at_pointer` plus the wildcard-path
variant grounded in `examples/original_source/tests/ondemand_wildcard_tests.cpp`).

This module only tokenizes path strings; resolving a token against a value
(deciding whether it's an object key or an array index, handling `-`, `.*`,
`[*]`) is stage-specific and lives on `tape::Value`/`ondemand::Value`
themselves, since tape values are already materialized while on-demand
values are resolved lazily against the cursor.
*/

use std::borrow::Cow;

use crate::error::Error;

/// Split an RFC 6901 JSON Pointer into its unescaped reference tokens.
///
/// `~1` decodes to `/` and `~0` decodes to `~` (order matters: `~01` is
/// `~1`, not `/`). An empty pointer resolves to the whole document (spec
/// §4.8, §8 P8).
pub(crate) fn tokenize(json_pointer: &str) -> Result<Vec<Cow<'_, str>>, Error> {
    if json_pointer.is_empty() {
        return Ok(Vec::new());
    }
    if !json_pointer.starts_with('/') {
        return Err(Error::InvalidJsonPointer);
    }

    json_pointer[1..].split('/').map(unescape_token).collect()
}

/// As [`tokenize`], but for a URI fragment form (`#/a/b`) -- the `#` is
/// stripped and remaining percent-escapes are left as-is since this crate
/// doesn't aim to be a general URI library; only the pointer escapes are
/// unescaped, matching the rest of this module's scope.
pub(crate) fn tokenize_uri_fragment(fragment: &str) -> Result<Vec<Cow<'_, str>>, Error> {
    let rest = fragment.strip_prefix('#').ok_or(Error::InvalidUriFragment)?;
    tokenize(rest).map_err(|_| Error::InvalidUriFragment)
}

fn unescape_token(raw: &str) -> Result<Cow<'_, str>, Error> {
    if !raw.contains('~') {
        return Ok(Cow::Borrowed(raw));
    }

    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return Err(Error::InvalidJsonPointer),
            }
        } else {
            out.push(c);
        }
    }
    Ok(Cow::Owned(out))
}

/// One segment of a wildcard path (`$.store.book[*].title`), per the
/// original's `ondemand_wildcard_tests.cpp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PathSegment<'a> {
    Key(&'a str),
    KeyWildcard,
    Index(usize),
    IndexWildcard,
}

/// Parse a wildcard path. The leading `$` (root) is optional and consumed
/// if present; what follows is a sequence of `.name`, `.*`, `[n]`, `[*]`.
pub(crate) fn tokenize_wildcard_path(path: &str) -> Result<Vec<PathSegment<'_>>, Error> {
    let mut rest = path.strip_prefix('$').unwrap_or(path);
    let mut segments = Vec::new();

    while !rest.is_empty() {
        if let Some(tail) = rest.strip_prefix('.') {
            let end = tail.find(['.', '[']).unwrap_or(tail.len());
            let (name, next) = tail.split_at(end);
            if name.is_empty() {
                return Err(Error::InvalidJsonPointer);
            }
            segments.push(if name == "*" { PathSegment::KeyWildcard } else { PathSegment::Key(name) });
            rest = next;
        } else if let Some(tail) = rest.strip_prefix('[') {
            let end = tail.find(']').ok_or(Error::InvalidJsonPointer)?;
            let (index, next) = tail.split_at(end);
            let next = &next[1..]; // drop the `]`
            segments.push(if index == "*" {
                PathSegment::IndexWildcard
            } else {
                PathSegment::Index(index.parse().map_err(|_| Error::InvalidJsonPointer)?)
            });
            rest = next;
        } else {
            return Err(Error::InvalidJsonPointer);
        }
    }

    Ok(segments)
}
