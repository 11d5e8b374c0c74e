//! # Row Encoding
//!
//! A row is a bincode map of column name → blob, so column overrides change
//! the stored layout rather than just the catalog.

use super::*;
use crate::domain::errors::PersistenceError;
use shared_types::{AuthenticationProfile, TicketAttributes, TicketParts, Timestamp};
use std::collections::BTreeMap;

type Row = BTreeMap<String, Vec<u8>>;

fn bincode_blob<T: serde::Serialize>(
    id: &TicketId,
    column: &str,
    value: &T,
) -> Result<Vec<u8>, PersistenceError> {
    bincode::serialize(value).map_err(|e| PersistenceError::Encoding {
        id: id.clone(),
        reason: format!("{column}: {e}"),
    })
}

impl<KV, PC> TicketStore<KV, PC>
where
    KV: KeyValueStore,
    PC: PrincipalCodec,
{
    pub(crate) fn encode_row(&self, ticket: &Ticket) -> Result<Vec<u8>, PersistenceError> {
        let id = ticket.id().ok_or(PersistenceError::Unidentified)?;
        let cols = &self.config.columns;

        let user = self
            .codec
            .encode(ticket.user())
            .map_err(|e| PersistenceError::Encoding {
                id: id.clone(),
                reason: format!("{}: {}", cols.user, e),
            })?;
        let attributes =
            serde_json::to_vec(ticket.attributes()).map_err(|e| PersistenceError::Encoding {
                id: id.clone(),
                reason: format!("{}: {}", cols.attributes, e),
            })?;

        let mut row = Row::new();
        row.insert(
            cols.expiration_time.clone(),
            ticket.expiration_time().to_le_bytes().to_vec(),
        );
        row.insert(
            cols.created_at.clone(),
            ticket.created_at().to_le_bytes().to_vec(),
        );
        row.insert(cols.user.clone(), user);
        row.insert(
            cols.authentication_profile.clone(),
            bincode_blob(id, &cols.authentication_profile, &ticket.authentication_profile())?,
        );
        row.insert(
            cols.authentication_profile_ids.clone(),
            bincode_blob(
                id,
                &cols.authentication_profile_ids,
                &ticket.authentication_profile_ids(),
            )?,
        );
        row.insert(
            cols.requestor_ids.clone(),
            bincode_blob(id, &cols.requestor_ids, &ticket.requestor_ids())?,
        );
        row.insert(
            cols.remote_idp.clone(),
            bincode_blob(id, &cols.remote_idp, &ticket.remote_idp())?,
        );
        row.insert(cols.attributes.clone(), attributes);

        bincode_blob(id, "row", &row)
    }

    fn parse_row(&self, id: &TicketId, bytes: &[u8]) -> Result<Row, RetrievalError> {
        bincode::deserialize(bytes).map_err(|e| RetrievalError::Malformed {
            id: id.clone(),
            reason: format!("row: {e}"),
        })
    }

    fn column<'r>(row: &'r Row, id: &TicketId, column: &str) -> Result<&'r [u8], RetrievalError> {
        row.get(column)
            .map(Vec::as_slice)
            .ok_or_else(|| RetrievalError::Malformed {
                id: id.clone(),
                reason: format!("missing column '{column}'"),
            })
    }

    fn timestamp_column(row: &Row, id: &TicketId, column: &str) -> Result<Timestamp, RetrievalError> {
        let bytes = Self::column(row, id, column)?;
        let bytes: [u8; 8] = bytes.try_into().map_err(|_| RetrievalError::Malformed {
            id: id.clone(),
            reason: format!("{column}: expected 8 bytes, found {}", bytes.len()),
        })?;
        Ok(u64::from_le_bytes(bytes))
    }

    fn bincode_column<T: serde::de::DeserializeOwned>(
        row: &Row,
        id: &TicketId,
        column: &str,
    ) -> Result<T, RetrievalError> {
        bincode::deserialize(Self::column(row, id, column)?).map_err(|e| {
            RetrievalError::Malformed {
                id: id.clone(),
                reason: format!("{column}: {e}"),
            }
        })
    }

    /// Expiration only; cheaper than a full decode and tolerant of damage in
    /// the blob columns.
    pub(crate) fn decode_expiration(
        &self,
        id: &TicketId,
        bytes: &[u8],
    ) -> Result<Timestamp, RetrievalError> {
        let row = self.parse_row(id, bytes)?;
        Self::timestamp_column(&row, id, &self.config.columns.expiration_time)
    }

    pub(crate) fn decode_row(&self, id: &TicketId, bytes: &[u8]) -> Result<Ticket, RetrievalError> {
        let row = self.parse_row(id, bytes)?;
        let cols = &self.config.columns;

        let user = self
            .codec
            .decode(Self::column(&row, id, &cols.user)?)
            .map_err(|e| RetrievalError::Malformed {
                id: id.clone(),
                reason: format!("{}: {}", cols.user, e),
            })?;
        let attributes: TicketAttributes =
            serde_json::from_slice(Self::column(&row, id, &cols.attributes)?).map_err(|e| {
                RetrievalError::Malformed {
                    id: id.clone(),
                    reason: format!("{}: {}", cols.attributes, e),
                }
            })?;
        let authentication_profile: Option<AuthenticationProfile> =
            Self::bincode_column(&row, id, &cols.authentication_profile)?;

        Ok(Ticket::from_parts(TicketParts {
            id: id.clone(),
            expiration_time: Self::timestamp_column(&row, id, &cols.expiration_time)?,
            created_at: Self::timestamp_column(&row, id, &cols.created_at)?,
            user,
            authentication_profile,
            authentication_profile_ids: Self::bincode_column(
                &row,
                id,
                &cols.authentication_profile_ids,
            )?,
            requestor_ids: Self::bincode_column(&row, id, &cols.requestor_ids)?,
            remote_idp: Self::bincode_column(&row, id, &cols.remote_idp)?,
            attributes,
        }))
    }
}
