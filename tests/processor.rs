use cmip_ld::{
	processor::Options, CacheOptions, Document, DocumentCache, Error, FsLoader, LoadError, Loader,
	PrefixMap, ProcessingEnvironment, Processor, Session, Warning,
};
use iref::Iri;
use serde_json::json;
use static_iref::iri;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

fn loader() -> FsLoader {
	let mut loader = FsLoader::new();
	loader.mount(iri!("https://example.org/").to_owned(), "tests/data/example.org");
	loader
}

/// Loader counting the loads it serves.
struct Counting<L> {
	inner: L,
	count: AtomicUsize,
}

impl<L> Counting<L> {
	fn new(inner: L) -> Self {
		Self {
			inner,
			count: AtomicUsize::new(0),
		}
	}

	fn count(&self) -> usize {
		self.count.load(Ordering::SeqCst)
	}
}

impl<L: Loader> Loader for Counting<L> {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		self.count.fetch_add(1, Ordering::SeqCst);
		tokio::task::yield_now().await;
		self.inner.load(url).await
	}
}

/// Loader answering after a delay.
struct Slow<L>(L, Duration);

impl<L: Loader> Loader for Slow<L> {
	async fn load(&self, url: &Iri) -> Result<Document, LoadError> {
		tokio::time::sleep(self.1).await;
		self.0.load(url).await
	}
}

#[tokio::test]
async fn round_trip() {
	let processor = Processor::new(loader());
	let processed = processor
		.get(iri!("https://example.org/activity/cmip.json"))
		.await
		.unwrap();

	assert!(processed.warnings.is_empty());
	assert!(processed.linked_fields().is_empty());
	assert_eq!(
		processed.document,
		json!({
			"@context": "_context_",
			"id": "cmip",
			"type": "activity",
			"name": "CMIP"
		})
	)
}

#[tokio::test]
async fn expanded_output() {
	let processor = Processor::new_using(loader(), Options::default().expanded());
	let processed = processor
		.get(iri!("https://example.org/activity/cmip.json"))
		.await
		.unwrap();

	assert_eq!(
		processed.document,
		json!([{
			"@id": "https://example.org/activity/cmip",
			"@type": ["https://example.org/vocab/activity"],
			"https://schema.org/name": [{ "@value": "CMIP" }]
		}])
	)
}

#[tokio::test]
async fn substitution_is_depth_limited() {
	let processor = Processor::new(loader());
	let processed = processor.get(iri!("https://example.org/chain/a")).await.unwrap();

	assert!(processed.warnings.is_empty());
	assert_eq!(
		processed.document,
		json!({
			"@context": "_context_",
			"id": "a",
			"type": "step",
			"name": "A",
			"next": {
				"id": "b",
				"type": "step",
				"name": "B",
				"next": {
					"id": "c",
					"type": "step",
					"name": "C",
					"next": "d"
				}
			}
		})
	)
}

#[tokio::test]
async fn references_past_the_limit_are_kept() {
	let options = Options::default().with_max_depth(1).expanded();
	let processor = Processor::new_using(loader(), options);
	let processed = processor.get(iri!("https://example.org/chain/a")).await.unwrap();

	let next = &processed.document[0]["https://example.org/vocab/next"][0];
	assert_eq!(next["@id"], json!("https://example.org/chain/b"));
	assert_eq!(
		next["https://example.org/vocab/next"],
		json!([{ "@id": "https://example.org/chain/c" }])
	)
}

#[tokio::test]
async fn failed_substitutions_keep_references() {
	let processor = Processor::new(loader());
	let processed = processor
		.get(iri!("https://example.org/normalize/seaice"))
		.await
		.unwrap();

	assert_eq!(processed.document["realm"], json!(["Sea_Ice", "ocean"]));
	let failed: Vec<_> = processed
		.warnings
		.iter()
		.filter_map(|w| match w {
			Warning::SubstitutionFailed(url, _) => Some(url.as_str()),
			_ => None,
		})
		.collect();
	assert_eq!(
		failed,
		[
			"https://example.org/normalize/Sea_Ice",
			"https://example.org/normalize/ocean"
		]
	)
}

#[tokio::test]
async fn normalized_output() {
	let options = Options::default().with_max_depth(0).normalized();
	let processor = Processor::new_using(loader(), options);
	let processed = processor
		.get(iri!("https://example.org/normalize/seaice"))
		.await
		.unwrap();

	assert!(processed.warnings.is_empty());
	assert_eq!(
		processed.document,
		json!({
			"@context": "_context_",
			"id": "seaice",
			"realm": ["sea-ice", "ocean"],
			"label": "Sea_Ice"
		})
	)
}

#[tokio::test]
async fn prefixed_queries() {
	let prefixes: PrefixMap = [("ex", "https://example.org/")].into_iter().collect();
	let processor = Processor::new_using(loader(), Options::default().with_prefixes(prefixes));

	let processed = processor.get_prefixed("ex:activity/cmip").await.unwrap();
	assert_eq!(processed.document["id"], json!("cmip"));
	assert!(processor.get_prefixed("nope:activity/cmip").await.is_err())
}

#[tokio::test]
async fn concurrent_loads_share_one_fetch() {
	let loader = Counting::new(loader());
	let session = Session::new(&loader);
	let url = iri!("https://example.org/activity/cmip");

	let (a, b) = futures::join!(session.loader().load(url), session.loader().load(url));
	assert_eq!(a.unwrap().document, b.unwrap().document);
	assert_eq!(loader.count(), 1);
	assert_eq!(session.cache().len(), 1)
}

#[tokio::test]
async fn shared_cache_across_calls() {
	let loader = Counting::new(loader());
	let processor = Processor::new(&loader).with_cache(DocumentCache::new());

	processor.get(iri!("https://example.org/chain/a")).await.unwrap();
	let first = loader.count();
	processor.get(iri!("https://example.org/chain/a")).await.unwrap();

	// a, b, c and their context.
	assert_eq!(first, 4);
	assert_eq!(loader.count(), first)
}

#[tokio::test]
async fn fetches_time_out() {
	let session = Session::with_options(
		Slow(loader(), Duration::from_secs(10)),
		DocumentCache::new(),
		CacheOptions::default().with_timeout(Duration::from_millis(20)),
	);

	let error = session
		.loader()
		.load(iri!("https://example.org/activity/cmip"))
		.await
		.unwrap_err();
	assert!(error.is_timeout());
	assert!(session.cache().is_empty())
}

#[tokio::test]
async fn top_level_timeout_is_an_error() {
	let options = Options::default().with_timeout(Duration::from_millis(20));
	let processor = Processor::new_using(Slow(loader(), Duration::from_secs(10)), options);

	assert!(matches!(
		processor.get(iri!("https://example.org/activity/cmip.json")).await,
		Err(Error::Loading(e)) if e.is_timeout()
	))
}
