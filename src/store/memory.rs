use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::{
    Founder, FundingRequest, FundingRequestPatch, Investor, MatchPatch, MatchRecord, MatchStatus,
    Notification, NotificationEvent, StatusBreakdown,
};

use super::StoreError;

/// In-memory realization of the directory, match store, funding-request store
/// and notification sink. All records are exclusively owned here; the
/// matching core never caches them across calls.
#[derive(Debug, Default)]
pub struct MemoryStore {
    founders: RwLock<HashMap<Uuid, Founder>>,
    investors: RwLock<HashMap<Uuid, Investor>>,
    requests: RwLock<HashMap<Uuid, FundingRequest>>,
    matches: RwLock<HashMap<Uuid, MatchRecord>>,
    notifications: RwLock<Vec<Notification>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    // --- Directory (read-only for the matching core) ---

    pub async fn insert_founder(&self, founder: Founder) {
        self.founders.write().await.insert(founder.id, founder);
    }

    pub async fn insert_investor(&self, investor: Investor) {
        self.investors.write().await.insert(investor.id, investor);
    }

    pub async fn find_founder_by_id(&self, id: Uuid) -> Option<Founder> {
        self.founders.read().await.get(&id).cloned()
    }

    pub async fn find_investor_by_id(&self, id: Uuid) -> Option<Investor> {
        self.investors.read().await.get(&id).cloned()
    }

    pub async fn find_verified_investors(&self) -> Vec<Investor> {
        self.investors
            .read()
            .await
            .values()
            .filter(|investor| investor.verified)
            .cloned()
            .collect()
    }

    // --- Funding-request store ---

    pub async fn insert_funding_request(&self, request: FundingRequest) {
        self.requests.write().await.insert(request.id, request);
    }

    pub async fn find_funding_request_by_id(&self, id: Uuid) -> Option<FundingRequest> {
        self.requests.read().await.get(&id).cloned()
    }

    pub async fn update_funding_request(
        &self,
        id: Uuid,
        patch: FundingRequestPatch,
    ) -> Result<FundingRequest, StoreError> {
        let mut requests = self.requests.write().await;
        let request = requests
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Funding request".to_string()))?;
        patch.apply_to(request);
        Ok(request.clone())
    }

    /// Remove a funding request and every match attached to it.
    pub async fn delete_funding_request(&self, id: Uuid) -> Result<FundingRequest, StoreError> {
        let removed = self
            .requests
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound("Funding request".to_string()))?;
        self.matches
            .write()
            .await
            .retain(|_, m| m.funding_request_id != id);
        Ok(removed)
    }

    // --- Match store ---

    /// Insert a batch of match records, all-or-nothing. Uniqueness on
    /// (funding_request_id, founder_id, investor_id) is checked against both
    /// existing records and the batch itself; a violation rejects the whole
    /// batch and names the offending investors.
    pub async fn create_matches(&self, records: Vec<MatchRecord>) -> Result<usize, StoreError> {
        let mut matches = self.matches.write().await;

        let mut duplicates: Vec<Uuid> = Vec::new();
        let mut batch_keys: Vec<(Uuid, Uuid, Uuid)> = Vec::new();
        for record in &records {
            let key = (
                record.funding_request_id,
                record.founder_id,
                record.investor_id,
            );
            let exists = matches.values().any(|m| {
                (m.funding_request_id, m.founder_id, m.investor_id) == key
            });
            if exists || batch_keys.contains(&key) {
                duplicates.push(record.investor_id);
            }
            batch_keys.push(key);
        }
        if !duplicates.is_empty() {
            return Err(StoreError::DuplicateMatch {
                investor_ids: duplicates,
            });
        }

        let inserted = records.len();
        for record in records {
            matches.insert(record.id, record);
        }
        Ok(inserted)
    }

    pub async fn find_match_by_id(&self, id: Uuid) -> Option<MatchRecord> {
        self.matches.read().await.get(&id).cloned()
    }

    pub async fn find_match_for_investor(
        &self,
        funding_request_id: Uuid,
        investor_id: Uuid,
    ) -> Option<MatchRecord> {
        self.matches
            .read()
            .await
            .values()
            .find(|m| m.funding_request_id == funding_request_id && m.investor_id == investor_id)
            .cloned()
    }

    /// Matches for one funding request, optionally filtered by status,
    /// sorted by score descending (newest first on ties).
    pub async fn find_matches_for_request(
        &self,
        funding_request_id: Uuid,
        status: Option<MatchStatus>,
    ) -> Vec<MatchRecord> {
        let mut result: Vec<MatchRecord> = self
            .matches
            .read()
            .await
            .values()
            .filter(|m| m.funding_request_id == funding_request_id)
            .filter(|m| status.map(|s| m.status == s).unwrap_or(true))
            .cloned()
            .collect();
        result.sort_by(|a, b| {
            b.match_score
                .cmp(&a.match_score)
                .then(b.created_at.cmp(&a.created_at))
        });
        result
    }

    pub async fn count_matches_for_request(&self, funding_request_id: Uuid) -> usize {
        self.matches
            .read()
            .await
            .values()
            .filter(|m| m.funding_request_id == funding_request_id)
            .count()
    }

    pub async fn status_breakdown_for_request(
        &self,
        funding_request_id: Uuid,
    ) -> StatusBreakdown {
        let statuses: Vec<MatchStatus> = self
            .matches
            .read()
            .await
            .values()
            .filter(|m| m.funding_request_id == funding_request_id)
            .map(|m| m.status)
            .collect();
        StatusBreakdown::from_statuses(statuses)
    }

    pub async fn update_match(
        &self,
        id: Uuid,
        patch: MatchPatch,
    ) -> Result<MatchRecord, StoreError> {
        let mut matches = self.matches.write().await;
        let record = matches
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Match".to_string()))?;
        patch.apply_to(record);
        Ok(record.clone())
    }

    pub async fn delete_match(&self, id: Uuid) -> Result<MatchRecord, StoreError> {
        self.matches
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| StoreError::NotFound("Match".to_string()))
    }

    /// Delete every match for a funding request, returning how many went.
    /// Racing callers simply observe zero matches afterwards.
    pub async fn delete_matches_for_request(&self, funding_request_id: Uuid) -> usize {
        let mut matches = self.matches.write().await;
        let before = matches.len();
        matches.retain(|_, m| m.funding_request_id != funding_request_id);
        before - matches.len()
    }

    // --- Notification sink ---

    /// Persist a notification event. Callers treat this as fire-and-forget:
    /// a failure here is logged, never propagated into the primary operation.
    pub async fn emit(&self, event: NotificationEvent) -> Result<(), StoreError> {
        self.notifications
            .write()
            .await
            .push(Notification::from_event(event));
        Ok(())
    }

    pub async fn notifications_for(&self, recipient_id: Uuid) -> Vec<Notification> {
        let mut result: Vec<Notification> = self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        result
    }
}
