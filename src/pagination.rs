// License: MIT
// Copyright © 2024 Frequenz Energy-as-a-Service GmbH

//! Cursor based pagination over ordered results, like a history of
//! [`ComponentData`][crate::ComponentData] snapshots.
//!
//! The first request of a sequence sets the page size.  Every response
//! carries an opaque `next_page_token` until the end of the results is
//! reached, and the token has to be sent back unchanged to get the next
//! page.  The page size of later requests is ignored, because it is part of
//! the token.
//!
//! Tokens are signed with HMAC-SHA256.  The free [`paginate`] function uses a
//! built-in key, which detects modified tokens but can't stop clients from
//! minting their own.  Services that hand tokens to untrusted clients should
//! use a [`Paginator`] with a secret key.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::Error;

type HmacSha256 = Hmac<Sha256>;

/// The page size used when the first request doesn't specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

const DEFAULT_TOKEN_KEY: &[u8] = b"frequenz-microgrid-component-data/page-token";

const TOKEN_VERSION: u8 = 2;
const PAYLOAD_LEN: usize = 21;
const TAG_LEN: usize = 32;

/// The pagination parameters of a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PaginationParams {
    /// The maximum number of items per page.  Only honored on the first
    /// request.  `None` or `0` means [`DEFAULT_PAGE_SIZE`].
    pub page_size: Option<u32>,
    /// The `next_page_token` of the previous response, if any.
    pub page_token: Option<String>,
}

impl PaginationParams {
    /// Parameters for the first page of a sequence.
    pub fn first_page(page_size: u32) -> Self {
        Self {
            page_size: Some(page_size),
            page_token: None,
        }
    }

    /// Parameters for the page following the response that returned `token`.
    pub fn next_page(token: impl Into<String>) -> Self {
        Self {
            page_size: None,
            page_token: Some(token.into()),
        }
    }
}

/// The pagination details of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaginationInfo {
    /// The total number of items in all the pages.
    pub total_items: usize,
    /// The token for requesting the next page, or `None` if this was the
    /// last page.
    pub next_page_token: Option<String>,
}

/// Returns the page of `items` described by `params`, using page tokens
/// signed with the built-in key.
///
/// See [`Paginator::paginate`].
pub fn paginate<'a, T>(
    items: &'a [T],
    params: &PaginationParams,
) -> Result<(&'a [T], PaginationInfo), Error> {
    Paginator::default().paginate(items, params)
}

/// Issues and checks page tokens signed with a key.
#[derive(Clone, Debug)]
pub struct Paginator {
    key: Vec<u8>,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(DEFAULT_TOKEN_KEY)
    }
}

impl Paginator {
    /// Creates a new [`Paginator`] that signs page tokens with `key`.
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self {
            key: key.as_ref().to_vec(),
        }
    }

    /// Returns the page of `items` described by `params`, together with the
    /// information needed to request the next page.
    ///
    /// Returns an error if the page token wasn't signed with this
    /// paginator's key, or was issued for a sequence with a different
    /// number of items.
    pub fn paginate<'a, T>(
        &self,
        items: &'a [T],
        params: &PaginationParams,
    ) -> Result<(&'a [T], PaginationInfo), Error> {
        let total_items = items.len() as u64;
        let cursor = match &params.page_token {
            Some(token) => self.decode(token)?,
            None => PageCursor {
                offset: 0,
                page_size: match params.page_size {
                    None | Some(0) => DEFAULT_PAGE_SIZE,
                    Some(size) => size,
                },
                total_items,
            },
        };

        if cursor.total_items != total_items {
            return Err(Error::invalid_page_token(format!(
                "Page token was issued for {} items, but there are {} items.",
                cursor.total_items, total_items
            )));
        }
        let start = usize::try_from(cursor.offset)
            .ok()
            .filter(|offset| *offset <= items.len())
            .ok_or_else(|| {
                Error::invalid_page_token(format!(
                    "Page token points to offset {}, but there are only {} items.",
                    cursor.offset,
                    items.len()
                ))
            })?;
        let end = start
            .saturating_add(cursor.page_size as usize)
            .min(items.len());

        let next_page_token = if end < items.len() {
            Some(self.encode(&PageCursor {
                offset: end as u64,
                ..cursor
            })?)
        } else {
            None
        };

        Ok((
            &items[start..end],
            PaginationInfo {
                total_items: items.len(),
                next_page_token,
            },
        ))
    }

    fn mac(&self) -> Result<HmacSha256, Error> {
        HmacSha256::new_from_slice(&self.key)
            .map_err(|e| Error::internal(format!("Can't create page token signer: {e}")))
    }

    fn encode(&self, cursor: &PageCursor) -> Result<String, Error> {
        let mut bytes = cursor.to_bytes().to_vec();
        let mut mac = self.mac()?;
        mac.update(&bytes);
        bytes.extend_from_slice(&mac.finalize().into_bytes());
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn decode(&self, token: &str) -> Result<PageCursor, Error> {
        let invalid = || Error::invalid_page_token(format!("Malformed page token: {token:?}"));

        let bytes = URL_SAFE_NO_PAD.decode(token).map_err(|_| invalid())?;
        if bytes.len() != PAYLOAD_LEN + TAG_LEN {
            return Err(invalid());
        }
        let (payload, tag) = bytes.split_at(PAYLOAD_LEN);
        let mut mac = self.mac()?;
        mac.update(payload);
        mac.verify_slice(tag).map_err(|_| invalid())?;

        PageCursor::from_bytes(payload).ok_or_else(invalid)
    }
}

/// The position in a sequence of results, that is encoded into page tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct PageCursor {
    offset: u64,
    page_size: u32,
    total_items: u64,
}

impl PageCursor {
    /// Layout: `[version:1][offset:8][page_size:4][total_items:8]`, big endian.
    fn to_bytes(self) -> [u8; PAYLOAD_LEN] {
        let mut bytes = [0u8; PAYLOAD_LEN];
        bytes[0] = TOKEN_VERSION;
        bytes[1..9].copy_from_slice(&self.offset.to_be_bytes());
        bytes[9..13].copy_from_slice(&self.page_size.to_be_bytes());
        bytes[13..21].copy_from_slice(&self.total_items.to_be_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != PAYLOAD_LEN || bytes[0] != TOKEN_VERSION {
            return None;
        }
        let cursor = Self {
            offset: u64::from_be_bytes(bytes[1..9].try_into().ok()?),
            page_size: u32::from_be_bytes(bytes[9..13].try_into().ok()?),
            total_items: u64::from_be_bytes(bytes[13..21].try_into().ok()?),
        };
        (cursor.page_size > 0).then_some(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use proptest::prelude::*;

    #[test]
    fn test_pages() -> Result<(), Error> {
        let items = (0..5).collect::<Vec<u32>>();

        let (page, info) = paginate(&items, &PaginationParams::first_page(2))?;
        assert_eq!(page, &[0, 1]);
        assert_eq!(info.total_items, 5);
        let Some(token) = info.next_page_token else {
            panic!("expected a next page token");
        };

        // the page size of later requests is ignored.
        let params = PaginationParams {
            page_size: Some(4),
            page_token: Some(token),
        };
        let (page, info) = paginate(&items, &params)?;
        assert_eq!(page, &[2, 3]);
        let Some(token) = info.next_page_token else {
            panic!("expected a next page token");
        };

        let (page, info) = paginate(&items, &PaginationParams::next_page(token))?;
        assert_eq!(page, &[4]);
        assert_eq!(info.next_page_token, None);

        Ok(())
    }

    #[test]
    fn test_exact_fit_and_defaults() -> Result<(), Error> {
        let items = (0..4).collect::<Vec<u32>>();

        let (page, info) = paginate(&items, &PaginationParams::first_page(4))?;
        assert_eq!(page, items.as_slice());
        assert_eq!(info.next_page_token, None);

        let (page, info) = paginate(&items, &PaginationParams::default())?;
        assert_eq!(page.len(), 4);
        assert_eq!(info.next_page_token, None);

        let items = (0..250).collect::<Vec<u32>>();
        let (page, info) = paginate(&items, &PaginationParams::first_page(0))?;
        assert_eq!(page.len(), DEFAULT_PAGE_SIZE as usize);
        assert!(info.next_page_token.is_some());

        let empty: [u32; 0] = [];
        let (page, info) = paginate(&empty, &PaginationParams::first_page(3))?;
        assert!(page.is_empty());
        assert_eq!(info.total_items, 0);
        assert_eq!(info.next_page_token, None);

        Ok(())
    }

    #[test]
    fn test_token_round_trip() -> Result<(), Error> {
        let paginator = Paginator::default();
        let cursor = PageCursor {
            offset: 1234,
            page_size: 17,
            total_items: 2000,
        };
        let token = paginator.encode(&cursor)?;
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        assert_eq!(paginator.decode(&token)?, cursor);
        assert_eq!(paginator.encode(&cursor)?, token);

        Ok(())
    }

    #[test]
    fn test_invalid_tokens() -> Result<(), Error> {
        let paginator = Paginator::default();
        let items = (0..10).collect::<Vec<u32>>();
        let is_invalid = |token: String| {
            paginate(&items, &PaginationParams::next_page(token))
                .is_err_and(|e| e.kind() == ErrorKind::InvalidPageToken)
        };

        assert!(is_invalid("not a token".to_string()));
        assert!(is_invalid(String::new()));

        let token = paginator.encode(&PageCursor {
            offset: 2,
            page_size: 2,
            total_items: 10,
        })?;
        let mut tampered = token.clone().into_bytes();
        tampered[3] = if tampered[3] == b'A' { b'B' } else { b'A' };
        assert!(is_invalid(String::from_utf8(tampered).unwrap()));
        assert!(is_invalid(token[..token.len() - 2].to_string()));

        let past_the_end = paginator.encode(&PageCursor {
            offset: 11,
            page_size: 2,
            total_items: 10,
        })?;
        assert!(paginate(&items, &PaginationParams::next_page(past_the_end)).is_err_and(|e| e
            == Error::invalid_page_token(
                "Page token points to offset 11, but there are only 10 items."
            )));

        let zero_size = paginator.encode(&PageCursor {
            offset: 0,
            page_size: 0,
            total_items: 10,
        })?;
        assert!(is_invalid(zero_size));

        Ok(())
    }

    #[test]
    fn test_tokens_bound_to_key() -> Result<(), Error> {
        let items = (0..20).collect::<Vec<u32>>();
        let paginator = Paginator::new(b"site-secret");

        // a token signed with the built-in key, asking for more than the
        // original page size.
        let minted = Paginator::default().encode(&PageCursor {
            offset: 7,
            page_size: 1000,
            total_items: 20,
        })?;
        assert!(paginator
            .paginate(&items, &PaginationParams::next_page(minted))
            .is_err_and(|e| e.kind() == ErrorKind::InvalidPageToken));

        let (page, info) = paginator.paginate(&items, &PaginationParams::first_page(7))?;
        assert_eq!(page.len(), 7);
        let Some(token) = info.next_page_token else {
            panic!("expected a next page token");
        };
        assert!(Paginator::new(b"other-secret")
            .paginate(&items, &PaginationParams::next_page(token.clone()))
            .is_err_and(|e| e.kind() == ErrorKind::InvalidPageToken));

        let (page, _) = paginator.paginate(&items, &PaginationParams::next_page(token))?;
        assert_eq!(page, &[7, 8, 9, 10, 11, 12, 13]);

        Ok(())
    }

    #[test]
    fn test_tokens_bound_to_sequence_length() -> Result<(), Error> {
        let items = (0..10).collect::<Vec<u32>>();
        let longer = (0..12).collect::<Vec<u32>>();

        let (_, info) = paginate(&items, &PaginationParams::first_page(3))?;
        let Some(token) = info.next_page_token else {
            panic!("expected a next page token");
        };
        assert!(paginate(&longer, &PaginationParams::next_page(token)).is_err_and(|e| e
            == Error::invalid_page_token(
                "Page token was issued for 10 items, but there are 12 items."
            )));

        Ok(())
    }

    proptest! {
        #[test]
        fn property_pages_cover_sequence(len in 0usize..60, page_size in 1u32..12) {
            let items = (0..len).collect::<Vec<_>>();
            let mut collected = vec![];
            let mut params = PaginationParams::first_page(page_size);
            loop {
                let (page, info) = paginate(&items, &params).unwrap();
                prop_assert!(page.len() <= page_size as usize);
                collected.extend_from_slice(page);
                match info.next_page_token {
                    Some(token) => params = PaginationParams::next_page(token),
                    None => break,
                }
            }
            prop_assert_eq!(collected, items);
        }
    }
}
