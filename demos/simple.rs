//! Simple queue usage example

use ring_pool::MpmcQueue;
use std::sync::Arc;
use std::thread;

fn main() {
    println!("ring_pool - Simple Example\n");

    // Create a queue with 16 slots
    let queue = Arc::new(MpmcQueue::<String>::new(16).unwrap());

    let producer_queue = queue.clone();
    let consumer_queue = queue.clone();

    let producer = thread::spawn(move || {
        for i in 0..10 {
            let mut message = format!("Message {}", i);
            println!("Pushing: {}", message);

            while let Err(e) = producer_queue.try_push(message) {
                // Queue is full, spin and retry
                message = e.into_inner();
                std::hint::spin_loop();
            }

            thread::sleep(std::time::Duration::from_millis(100));
        }
        println!("Producer finished!");
    });

    let consumer = thread::spawn(move || {
        for _ in 0..10 {
            loop {
                match consumer_queue.try_pop() {
                    Some(message) => {
                        println!("Popped: {}", message);
                        break;
                    }
                    None => {
                        // Queue is empty, spin and retry
                        std::hint::spin_loop();
                    }
                }
            }
        }
        println!("Consumer finished!");
    });

    producer.join().unwrap();
    consumer.join().unwrap();

    println!("\nExample completed successfully!");
}
