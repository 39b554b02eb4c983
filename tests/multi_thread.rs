#![cfg(feature = "thread_safe")]

use std::{
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::Duration,
};

use syringe::{Bind, ConstructErrorKind, Container, Inject};
use tracing_test::traced_test;

struct Pool(u8);
struct Repository(Arc<Pool>);

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[traced_test]
async fn test_concurrent_get_across_threads() {
    let call_count = Arc::new(AtomicU8::new(0));

    let container = Container::new({
        let call_count = call_count.clone();
        move |bind: &mut Bind| {
            bind.singleton_async(move || {
                let call_count = call_count.clone();
                async move {
                    call_count.fetch_add(1, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    Ok::<_, ConstructErrorKind>(Pool(8))
                }
            })
            .singleton(|Inject(pool): Inject<Pool>| Ok::<_, ConstructErrorKind>(Repository(pool)));
            Ok(())
        }
    })
    .unwrap();

    let handles = (0..16)
        .map(|_| {
            let container = container.clone();
            tokio::spawn(async move { container.get::<Repository>().await })
        })
        .collect::<Vec<_>>();

    let mut repositories = Vec::with_capacity(handles.len());
    for handle in handles {
        repositories.push(handle.await.unwrap().unwrap());
    }

    let pool = container.get::<Pool>().await.unwrap();
    assert_eq!(pool.0, 8);
    assert!(repositories.iter().all(|repository| Arc::ptr_eq(&repository.0, &pool)));
    assert_eq!(call_count.load(Ordering::SeqCst), 1);
}
