use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateReviewDto {
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    #[validate(range(min = 1, max = 5, message = "Communication rating must be between 1 and 5"))]
    pub communication_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Quality rating must be between 1 and 5"))]
    pub quality_rating: Option<i32>,

    #[validate(range(min = 1, max = 5, message = "Timeliness rating must be between 1 and 5"))]
    pub timeliness_rating: Option<i32>,

    #[validate(length(min = 10, max = 1000, message = "Comment must be between 10 and 1000 characters"))]
    pub comment: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn rating_bounds_are_enforced() {
        let dto = CreateReviewDto {
            rating: 6,
            communication_rating: None,
            quality_rating: None,
            timeliness_rating: None,
            comment: "Delivered everything on time.".to_string(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn sub_ratings_are_optional() {
        let dto = CreateReviewDto {
            rating: 4,
            communication_rating: Some(5),
            quality_rating: None,
            timeliness_rating: None,
            comment: "Delivered everything on time.".to_string(),
        };
        assert!(dto.validate().is_ok());
    }
}
