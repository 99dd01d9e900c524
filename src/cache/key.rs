/// Trait for typed cache keys.
///
/// A key identifies one logical query: the entity kind plus the parameters
/// that narrow it (a filter, an id).
pub trait QueryKey {
  /// Entity-kind tag grouping related queries (e.g. every filtered
  /// variant of a listing shares one kind for bulk invalidation).
  fn kind(&self) -> &'static str;

  /// Stable identity for cache lookups.
  fn cache_hash(&self) -> String;

  /// Human-readable form for logs.
  fn description(&self) -> String;
}
