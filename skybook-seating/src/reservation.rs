use skybook_core::booking::{ReservationRequest, Ticket, TicketInfo};
use skybook_core::{CoreError, CoreResult};
use crate::session::SeatingSession;

/// Turn the session into the booking payload: one ticket per passenger per
/// leg, outbound tickets first.
///
/// Every passenger must hold a seat on every leg, and the seat must still be
/// free according to the last fetched occupancy. The backend checks again on
/// its side.
pub fn build_reservation(session: &SeatingSession, buyer_id: u32) -> CoreResult<ReservationRequest> {
    if session.passengers().next().is_none() {
        return Err(CoreError::Validation("reservation has no passengers".to_string()));
    }

    let mut tickets = Vec::new();

    for leg in session.legs() {
        for (passenger, info) in session.passengers() {
            let seat = leg.selection().selection_of(passenger).ok_or_else(|| {
                CoreError::Validation(format!(
                    "passenger {} has no {} seat",
                    passenger, leg.leg
                ))
            })?;

            if leg.occupancy().contains(seat) {
                return Err(CoreError::Validation(format!(
                    "seat {} on the {} flight is already occupied",
                    seat, leg.leg
                )));
            }

            tickets.push(Ticket {
                ticket_info: TicketInfo {
                    id_flight: leg.flight_id,
                    id_seat: seat,
                    additional_baggage: Vec::new(),
                },
                passenger_info: info.clone(),
            });
        }
    }

    Ok(ReservationRequest {
        id_buyer: buyer_id,
        tickets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::tests::{aircraft, passenger};
    use skybook_core::{CellId, FlightId, Leg, OccupancyIndex};

    #[test]
    fn test_round_trip_tickets() {
        let mut session = SeatingSession::new(FlightId(10), Some(FlightId(20)));
        let a = session.add_passenger(passenger("Anna"));
        let b = session.add_passenger(passenger("Bruno"));
        for leg in session.legs_mut() {
            leg.replace(aircraft(&[1, 2, 3]), OccupancyIndex::new());
        }

        let outbound = session.leg_mut(Leg::Outbound).unwrap();
        outbound.select(a, CellId(1));
        outbound.select(b, CellId(2));
        let inbound = session.leg_mut(Leg::Return).unwrap();
        inbound.select(a, CellId(3));
        inbound.select(b, CellId(1));

        let request = build_reservation(&session, 77).unwrap();
        assert_eq!(request.id_buyer, 77);

        let tickets: Vec<(FlightId, CellId, &str)> = request
            .tickets
            .iter()
            .map(|t| (t.ticket_info.id_flight, t.ticket_info.id_seat, t.passenger_info.name.as_str()))
            .collect();
        assert_eq!(
            tickets,
            vec![
                (FlightId(10), CellId(1), "Anna"),
                (FlightId(10), CellId(2), "Bruno"),
                (FlightId(20), CellId(3), "Anna"),
                (FlightId(20), CellId(1), "Bruno"),
            ]
        );
    }

    #[test]
    fn test_missing_seat_is_rejected() {
        let mut session = SeatingSession::new(FlightId(10), Some(FlightId(20)));
        let a = session.add_passenger(passenger("Anna"));
        for leg in session.legs_mut() {
            leg.replace(aircraft(&[1, 2]), OccupancyIndex::new());
        }
        session.leg_mut(Leg::Outbound).unwrap().select(a, CellId(1));

        let err = build_reservation(&session, 1).unwrap_err();
        assert!(matches!(err, CoreError::Validation(msg) if msg.contains("return")));
    }

    #[test]
    fn test_empty_session_is_rejected() {
        let session = SeatingSession::new(FlightId(10), None);
        assert!(build_reservation(&session, 1).is_err());
    }
}
