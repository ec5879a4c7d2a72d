use crate::entities::Place;

/// Sorts `places` by where their id appears in `optimized_ids`.
///
/// Places whose id is absent from `optimized_ids` are dropped. Places sharing
/// an id all take its first position and keep their relative order.
pub fn reorder(places: Vec<Place>, optimized_ids: &[String]) -> Vec<Place> {
    let mut ranked: Vec<(usize, Place)> = places
        .into_iter()
        .filter_map(|place| {
            optimized_ids
                .iter()
                .position(|id| *id == place.place_id)
                .map(|i| (i, place))
        })
        .collect();

    ranked.sort_by_key(|(i, _)| *i);

    ranked.into_iter().map(|(_, place)| place).collect()
}
