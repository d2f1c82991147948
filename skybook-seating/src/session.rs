use std::collections::BTreeMap;
use skybook_core::booking::PassengerInfo;
use skybook_core::{FlightId, Leg, PassengerId};
use crate::leg::LegSeating;

/// State of one reservation form: its passengers and one `LegSeating` per
/// direction. Dropping the session is the teardown signal for in-flight
/// loads.
#[derive(Debug, Clone)]
pub struct SeatingSession {
    passengers: BTreeMap<PassengerId, PassengerInfo>,
    next_passenger: u32,
    outbound: LegSeating,
    inbound: Option<LegSeating>,
}

impl SeatingSession {
    pub fn new(outbound_flight: FlightId, return_flight: Option<FlightId>) -> Self {
        Self {
            passengers: BTreeMap::new(),
            next_passenger: 0,
            outbound: LegSeating::new(Leg::Outbound, outbound_flight),
            inbound: return_flight.map(|flight| LegSeating::new(Leg::Return, flight)),
        }
    }

    pub fn add_passenger(&mut self, info: PassengerInfo) -> PassengerId {
        let id = PassengerId(self.next_passenger);
        self.next_passenger += 1;
        self.passengers.insert(id, info);
        id
    }

    /// Remove a passenger and release their seats on every leg. Other
    /// passengers keep their ids.
    pub fn remove_passenger(&mut self, passenger: PassengerId) -> bool {
        if self.passengers.remove(&passenger).is_none() {
            return false;
        }
        for leg in self.legs_mut() {
            leg.clear(passenger);
        }
        true
    }

    pub fn passenger(&self, passenger: PassengerId) -> Option<&PassengerInfo> {
        self.passengers.get(&passenger)
    }

    pub fn has_passenger(&self, passenger: PassengerId) -> bool {
        self.passengers.contains_key(&passenger)
    }

    pub fn passengers(&self) -> impl Iterator<Item = (PassengerId, &PassengerInfo)> {
        self.passengers.iter().map(|(id, info)| (*id, info))
    }

    pub fn leg(&self, leg: Leg) -> Option<&LegSeating> {
        match leg {
            Leg::Outbound => Some(&self.outbound),
            Leg::Return => self.inbound.as_ref(),
        }
    }

    pub fn leg_mut(&mut self, leg: Leg) -> Option<&mut LegSeating> {
        match leg {
            Leg::Outbound => Some(&mut self.outbound),
            Leg::Return => self.inbound.as_mut(),
        }
    }

    /// Outbound first, then return when present.
    pub fn legs(&self) -> impl Iterator<Item = &LegSeating> {
        std::iter::once(&self.outbound).chain(self.inbound.iter())
    }

    pub fn legs_mut(&mut self) -> impl Iterator<Item = &mut LegSeating> {
        std::iter::once(&mut self.outbound).chain(self.inbound.iter_mut())
    }
}
