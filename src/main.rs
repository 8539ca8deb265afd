use hub_dispatch::{Clock, DeliveryStatus, Hub, HubConfig, NearestNeighbor, ShortestPath};

const SAMPLE_DATA: &str = include_str!("../data/sample_hub.json");

fn main() {
    env_logger::init();

    let config = HubConfig::default();
    let mut hub = match Hub::from_json(config, SAMPLE_DATA) {
        Ok(hub) => hub,
        Err(e) => {
            eprintln!("Error loading hub data: {}", e);
            return;
        }
    };

    // Package 9 has a wrong address until the correction comes in
    if let Err(e) = hub.correct_package(9, "410 S State St", "84111", "corrected at 10:20 am") {
        eprintln!("Error correcting package: {}", e);
        return;
    }

    // Same starting state, routed with the alternate planner for comparison
    let mut reference = hub.clone();

    let start_time = std::time::Instant::now();
    if let Err(e) = hub.run(&NearestNeighbor) {
        eprintln!("Error planning routes: {}", e);
        return;
    }
    let elapsed = start_time.elapsed();

    let depot = hub.graph().label(hub.graph().depot());
    println!("Delivery Routes (planned in {:.2?}):", elapsed);
    println!("------------------------------------------");
    for (i, route) in hub.routes().iter().enumerate() {
        println!("Trip {} - Truck {}", i + 1, route.truck_id);
        println!("  Departs: {}  Returns: {}", route.departure, route.return_time);
        println!("  Miles: {:.1}", route.mileage);
        println!("  Path: {}", route.path(&depot).join(" -> "));
        for stop in &route.stops {
            println!(
                "    {} at {}: packages {:?}",
                stop.label, stop.arrival, stop.packages
            );
        }
    }

    for (truck_id, miles) in hub.truck_mileage() {
        println!("Truck {} drove {:.1} miles", truck_id, miles);
    }
    println!(
        "\nThe total distance traveled by all trucks is {:.2}",
        hub.total_mileage()
    );

    let late = hub.late_packages();
    if late.is_empty() {
        println!("Every package met its deadline");
    } else {
        println!("Late packages: {:?}", late);
    }

    let check_time = Clock::from_hours(10.0);
    let snapshot = hub.status_at(check_time);
    let count = |status: DeliveryStatus| snapshot.iter().filter(|(_, s)| *s == status).count();
    println!(
        "\nAt {}: {} at hub, {} in route, {} delivered",
        check_time,
        count(DeliveryStatus::AtHub),
        count(DeliveryStatus::InRoute),
        count(DeliveryStatus::Delivered)
    );

    match reference.run(&ShortestPath) {
        Ok(_) => println!(
            "Shortest-path ordering for comparison: {:.2} miles",
            reference.total_mileage()
        ),
        Err(e) => eprintln!("Error planning reference routes: {}", e),
    }
}
