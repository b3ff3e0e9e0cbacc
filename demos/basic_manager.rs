use std::sync::{Arc, Mutex};

use lrukit::builder::CacheManagerBuilder;

fn main() {
    let evicted = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&evicted);

    let cache = CacheManagerBuilder::<&str, i32>::new(3)
        .on_evict(move |_, key| sink.lock().unwrap().push(*key))
        .build()
        .unwrap();

    cache.put("A", 1).unwrap();
    cache.put("B", 2).unwrap();
    cache.put("C", 3).unwrap();

    println!("lru: {}", cache.least_recently_used().unwrap());
    println!("mru: {}", cache.most_recently_used().unwrap());

    if let Some(value) = cache.get(&"A").unwrap() {
        println!("hit A: {value}");
    }

    cache.put("D", 4).unwrap();

    println!("evicted: {:?}", evicted.lock().unwrap());
    println!("contains B? {}", cache.contains(&"B").unwrap());
    println!("size: {}", cache.current_size().unwrap());

    cache.dispose();
    println!("after dispose: {:?}", cache.get(&"A"));
}

// Expected output:
// lru: 1
// mru: 3
// hit A: 1
// evicted: ["B"]
// contains B? false
// size: 3
// after dispose: Err(Disposed)
//
// Explanation: capacity=3; get(&"A") makes A the MRU, leaving B as the LRU.
// Inserting D evicts B, and the observer registered through the builder
// receives its key.
