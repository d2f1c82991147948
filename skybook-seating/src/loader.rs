use serde::Serialize;
use std::sync::Weak;
use tokio::sync::Mutex;
use tracing::{info, warn};
use skybook_core::repository::{OccupancySource, SeatMapSource};
use skybook_core::{FlightId, Leg, OccupancyIndex};
use crate::selection::Eviction;
use crate::session::SeatingSession;

/// What happened to one leg during a refresh.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LegRefresh {
    Applied {
        leg: Leg,
        seats: usize,
        occupied: usize,
        evicted: Vec<Eviction>,
    },
    /// Fetch failed; the leg kept its previous data
    Failed { leg: Leg, reason: String },
    /// The session was closed, or the leg now points at another flight
    Discarded { leg: Leg },
}

impl LegRefresh {
    pub fn leg(&self) -> Leg {
        match self {
            LegRefresh::Applied { leg, .. }
            | LegRefresh::Failed { leg, .. }
            | LegRefresh::Discarded { leg } => *leg,
        }
    }
}

/// Refetch seat map and occupancy for every leg of `session`.
///
/// Legs are fetched concurrently and each one is written back as soon as its
/// own responses arrive. Only the `Weak` handle is held while waiting, so a
/// session closed in the meantime simply discards the result.
pub async fn refresh_legs<S>(session: &Weak<Mutex<SeatingSession>>, source: &S) -> Vec<LegRefresh>
where
    S: SeatMapSource + OccupancySource + ?Sized,
{
    let targets: Vec<(Leg, FlightId)> = match session.upgrade() {
        Some(session) => {
            let guard = session.lock().await;
            guard.legs().map(|l| (l.leg, l.flight_id)).collect()
        }
        None => return Vec::new(),
    };

    match targets.as_slice() {
        [outbound] => vec![refresh_leg(session.clone(), source, outbound.0, outbound.1).await],
        [outbound, inbound] => {
            let (a, b) = tokio::join!(
                refresh_leg(session.clone(), source, outbound.0, outbound.1),
                refresh_leg(session.clone(), source, inbound.0, inbound.1),
            );
            vec![a, b]
        }
        _ => Vec::new(),
    }
}

async fn refresh_leg<S>(
    session: Weak<Mutex<SeatingSession>>,
    source: &S,
    leg: Leg,
    flight_id: FlightId,
) -> LegRefresh
where
    S: SeatMapSource + OccupancySource + ?Sized,
{
    let (seat_map, occupied) = tokio::join!(
        source.flight_seat_map(flight_id),
        source.occupied_seats(flight_id),
    );

    let Some(session) = session.upgrade() else {
        warn!("Discarding {} seat data for flight {}: session closed", leg, flight_id);
        return LegRefresh::Discarded { leg };
    };

    let (seat_map, occupancy) = match (seat_map, occupied) {
        (Ok(map), Ok(blocks)) => (map, OccupancyIndex::from_blocks(&blocks)),
        (Err(e), _) | (_, Err(e)) => {
            warn!("Failed to load {} seats for flight {}: {}", leg, flight_id, e);
            return LegRefresh::Failed { leg, reason: e.to_string() };
        }
    };

    let mut guard = session.lock().await;
    let Some(state) = guard.leg_mut(leg).filter(|s| s.flight_id == flight_id) else {
        return LegRefresh::Discarded { leg };
    };

    let seats = seat_map.total_seats();
    let occupied = occupancy.len();
    let evicted = state.replace(seat_map, occupancy);
    info!(
        "Loaded {} seats for flight {} ({} seats, {} occupied, {} selections released)",
        leg,
        flight_id,
        seats,
        occupied,
        evicted.len()
    );

    LegRefresh::Applied { leg, seats, occupied, evicted }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use skybook_core::occupancy::{OccupiedBlock, OccupiedSeat};
    use skybook_core::{AircraftId, AircraftSeatMap, CellId, CoreError, CoreResult};
    use crate::session::tests::{aircraft, passenger};

    /// In-memory backend with per-flight latency.
    struct FakeSource {
        maps: HashMap<FlightId, AircraftSeatMap>,
        occupied: HashMap<FlightId, Vec<u32>>,
        delay: HashMap<FlightId, Duration>,
    }

    impl FakeSource {
        fn new() -> Self {
            Self {
                maps: HashMap::new(),
                occupied: HashMap::new(),
                delay: HashMap::new(),
            }
        }

        fn flight(mut self, id: u32, seats: &[u32], occupied: &[u32]) -> Self {
            self.maps.insert(FlightId(id), aircraft(seats));
            self.occupied.insert(FlightId(id), occupied.to_vec());
            self
        }

        fn slow(mut self, id: u32, millis: u64) -> Self {
            self.delay.insert(FlightId(id), Duration::from_millis(millis));
            self
        }
    }

    #[async_trait]
    impl SeatMapSource for FakeSource {
        async fn flight_seat_map(&self, flight_id: FlightId) -> CoreResult<AircraftSeatMap> {
            if let Some(delay) = self.delay.get(&flight_id) {
                tokio::time::sleep(*delay).await;
            }
            self.maps
                .get(&flight_id)
                .cloned()
                .ok_or_else(|| CoreError::Upstream(format!("404 flight {}", flight_id)))
        }

        async fn aircraft_seat_map(&self, _: &str, _: AircraftId) -> CoreResult<AircraftSeatMap> {
            Err(CoreError::NotFound("aircraft".to_string()))
        }
    }

    #[async_trait]
    impl OccupancySource for FakeSource {
        async fn occupied_seats(&self, flight_id: FlightId) -> CoreResult<Vec<OccupiedBlock>> {
            let seats = self.occupied.get(&flight_id).cloned().unwrap_or_default();
            Ok(vec![OccupiedBlock {
                id_cell_block: Some(1),
                id_class: None,
                occupied_seats: seats.len() as u32,
                seats: seats
                    .into_iter()
                    .map(|id| OccupiedSeat { id_cell: CellId(id), x: 0, y: 0 })
                    .collect(),
            }])
        }
    }

    #[tokio::test]
    async fn test_loads_both_legs() {
        let source = FakeSource::new().flight(1, &[1, 2, 3], &[2]).flight(2, &[7, 8], &[]);
        let session = Arc::new(Mutex::new(SeatingSession::new(FlightId(1), Some(FlightId(2)))));

        let results = refresh_legs(&Arc::downgrade(&session), &source).await;
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| matches!(r, LegRefresh::Applied { .. })));

        let guard = session.lock().await;
        assert!(guard.leg(Leg::Outbound).unwrap().occupancy().contains(CellId(2)));
        assert_eq!(guard.leg(Leg::Return).unwrap().seat_map().unwrap().total_seats(), 2);
    }

    #[tokio::test]
    async fn test_failed_leg_keeps_previous_state() {
        let source = FakeSource::new().flight(1, &[1, 2], &[]);
        let session = Arc::new(Mutex::new(SeatingSession::new(FlightId(1), Some(FlightId(404)))));
        {
            let mut guard = session.lock().await;
            let p = guard.add_passenger(passenger("Anna"));
            let inbound = guard.leg_mut(Leg::Return).unwrap();
            inbound.replace(aircraft(&[5]), OccupancyIndex::new());
            inbound.select(p, CellId(5));
        }

        let results = refresh_legs(&Arc::downgrade(&session), &source).await;
        assert!(matches!(results[0], LegRefresh::Applied { .. }));
        assert!(matches!(results[1], LegRefresh::Failed { leg: Leg::Return, .. }));

        let guard = session.lock().await;
        let inbound = guard.leg(Leg::Return).unwrap();
        assert_eq!(inbound.selection().selection_of(skybook_core::PassengerId(0)), Some(CellId(5)));
        assert_eq!(inbound.seat_map().unwrap().total_seats(), 1);
    }

    #[tokio::test]
    async fn test_fast_leg_does_not_wait_for_slow_leg() {
        let source = Arc::new(FakeSource::new().flight(1, &[1], &[]).flight(2, &[2], &[]).slow(2, 200));
        let session = Arc::new(Mutex::new(SeatingSession::new(FlightId(1), Some(FlightId(2)))));

        let task = {
            let handle = Arc::downgrade(&session);
            let source = source.clone();
            tokio::spawn(async move { refresh_legs(&handle, source.as_ref()).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        {
            let guard = session.lock().await;
            assert!(guard.leg(Leg::Outbound).unwrap().is_loaded());
            assert!(!guard.leg(Leg::Return).unwrap().is_loaded());
        }

        let results = task.await.unwrap();
        assert!(results.iter().all(|r| matches!(r, LegRefresh::Applied { .. })));
    }

    #[tokio::test]
    async fn test_closed_session_discards_response() {
        let source = Arc::new(FakeSource::new().flight(1, &[1], &[]).slow(1, 100));
        let session = Arc::new(Mutex::new(SeatingSession::new(FlightId(1), None)));
        let handle = Arc::downgrade(&session);

        let task = {
            let source = source.clone();
            tokio::spawn(async move {
                refresh_leg(handle, source.as_ref(), Leg::Outbound, FlightId(1)).await
            })
        };

        drop(session);
        let result = task.await.unwrap();
        assert!(matches!(result, LegRefresh::Discarded { leg: Leg::Outbound }));
    }

    #[tokio::test]
    async fn test_refresh_holds_no_strong_handle() {
        let source = Arc::new(FakeSource::new().flight(1, &[1], &[]).flight(2, &[2], &[]).slow(1, 100).slow(2, 100));
        let session = Arc::new(Mutex::new(SeatingSession::new(FlightId(1), Some(FlightId(2)))));
        let handle = Arc::downgrade(&session);

        let task = {
            let handle = handle.clone();
            let source = source.clone();
            tokio::spawn(async move { refresh_legs(&handle, source.as_ref()).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(Arc::strong_count(&session), 1);
        drop(session);

        let results = task.await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| matches!(r, LegRefresh::Discarded { .. })));
        assert!(refresh_legs(&handle, source.as_ref()).await.is_empty());
    }
}
