use rand::Rng;

/// Curated city backdrops, keyed by lowercase city name
const CITY_IMAGES: [(&str, &str); 16] = [
    ("london", "https://images.pexels.com/photos/460672/pexels-photo-460672.jpeg"),
    ("new york", "https://images.pexels.com/photos/466685/pexels-photo-466685.jpeg"),
    ("tokyo", "https://images.pexels.com/photos/2614818/pexels-photo-2614818.jpeg"),
    ("paris", "https://images.pexels.com/photos/2363/france-landmark-lights-night.jpg"),
    ("sydney", "https://images.pexels.com/photos/1878293/pexels-photo-1878293.jpeg"),
    ("mumbai", "https://images.pexels.com/photos/1007426/pexels-photo-1007426.jpeg"),
    ("berlin", "https://images.pexels.com/photos/109629/pexels-photo-109629.jpeg"),
    ("toronto", "https://images.pexels.com/photos/374870/pexels-photo-374870.jpeg"),
    ("moscow", "https://images.pexels.com/photos/753339/pexels-photo-753339.jpeg"),
    ("cairo", "https://images.pexels.com/photos/71241/pexels-photo-71241.jpeg"),
    ("bangkok", "https://images.pexels.com/photos/1519088/pexels-photo-1519088.jpeg"),
    ("rome", "https://images.pexels.com/photos/532263/pexels-photo-532263.jpeg"),
    ("madrid", "https://images.pexels.com/photos/1388030/pexels-photo-1388030.jpeg"),
    ("amsterdam", "https://images.pexels.com/photos/1105766/pexels-photo-1105766.jpeg"),
    ("seoul", "https://images.pexels.com/photos/237211/pexels-photo-237211.jpeg"),
    ("dubai", "https://images.pexels.com/photos/1470405/pexels-photo-1470405.jpeg"),
];

/// Fallbacks for cities not in the table
const FALLBACK_IMAGES: [&str; 7] = [
    "https://images.pexels.com/photos/466685/pexels-photo-466685.jpeg",
    "https://images.pexels.com/photos/374870/pexels-photo-374870.jpeg",
    "https://images.pexels.com/photos/1519088/pexels-photo-1519088.jpeg",
    "https://images.pexels.com/photos/2363/france-landmark-lights-night.jpg",
    "https://images.pexels.com/photos/1105766/pexels-photo-1105766.jpeg",
    "https://images.pexels.com/photos/1878293/pexels-photo-1878293.jpeg",
    "https://images.pexels.com/photos/109629/pexels-photo-109629.jpeg",
];

/// Returns a backdrop image url for a city, drawing a random fallback when
/// the city is not in the curated table
///
/// # Arguments
///
/// * 'city' - city name, optionally with a ", CC" country suffix
/// * 'rng' - random source for the fallback pick
pub fn lookup<R: Rng>(city: &str, rng: &mut R) -> &'static str {
    let key = city.to_lowercase();
    let key = key.split(',').next().unwrap_or("").trim();

    CITY_IMAGES.iter()
        .find(|(name, _)| *name == key)
        .map(|(_, url)| *url)
        .unwrap_or_else(|| FALLBACK_IMAGES[rng.gen_range(0..FALLBACK_IMAGES.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn known_city_is_case_insensitive() {
        let mut rng = StdRng::seed_from_u64(1);
        let url = lookup("LONDON", &mut rng);
        assert_eq!(url, "https://images.pexels.com/photos/460672/pexels-photo-460672.jpeg");
    }

    #[test]
    fn country_suffix_is_stripped() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(lookup("Tokyo, JP", &mut rng), lookup("tokyo", &mut rng));
    }

    #[test]
    fn unknown_city_gets_a_fallback() {
        let mut rng = StdRng::seed_from_u64(1);
        let url = lookup("Smallville", &mut rng);
        assert!(FALLBACK_IMAGES.contains(&url));
    }
}
