pub mod bathroom_log;
pub mod dog;
pub mod feeding;
pub mod stats;

pub use bathroom_log::BathroomLogService;
pub use dog::DogService;
pub use feeding::FeedingService;

use sea_orm::Order;

use crate::models::shared::SortSpec;

pub(crate) fn sort_order(sort: &SortSpec) -> Order {
    if sort.descending {
        Order::Desc
    } else {
        Order::Asc
    }
}
