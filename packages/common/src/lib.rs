pub mod object_id;
pub mod vocabulary;

pub use object_id::{ObjectId, ObjectIdError};
pub use vocabulary::{BathroomType, Consistency, FoodType, Gender, MealTime, StoolColor};
