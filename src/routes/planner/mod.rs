pub mod destinations;
pub mod enrichment;
pub mod events;
pub mod itineraries;
pub mod items;
pub mod recommendations;
