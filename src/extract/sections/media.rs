use scraper::ElementRef;

use crate::extract::normalize::picture_dimensions;
use crate::extract::resolver::resolve_value;
use crate::extract::selectors::MediaSelectors;
use crate::types::PictureDimension;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Media {
    pub profile_pic: String,
    pub profile_pic_high_quality: String,
    pub profile_pic_all_dimensions: Vec<PictureDimension>,
}

pub fn extract(scope: ElementRef<'_>, selectors: &MediaSelectors) -> Media {
    let src = resolve_value(&selectors.picture, scope);
    let dimensions = picture_dimensions(&src);
    let url_at = |i: usize| {
        dimensions
            .get(i)
            .map(|d| d.url.clone())
            .unwrap_or_else(|| src.clone())
    };
    Media {
        profile_pic: url_at(0),
        profile_pic_high_quality: url_at(1),
        profile_pic_all_dimensions: dimensions.clone(),
    }
}
