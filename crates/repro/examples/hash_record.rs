use std::env;

fn main() {
    let path = env::args().nth(1).expect("path to record");
    let record = repro::RunRecord::read_from_path(&path).expect("read record");
    let hash = repro::hash_record(&record).expect("hash record");
    println!("{hash}");
}
