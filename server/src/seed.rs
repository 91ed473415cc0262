//! Mock data loaded into in-memory storage.

use backoffice_engine::{Record, RowId};
use serde_json::{json, Value};

/// Seed rows for every built-in view, stamped with `now`.
pub fn mock_data(now: u64) -> Vec<(String, Vec<Record>)> {
    vec![
        collection("buyers", now, text_ids("buyer", buyers())),
        collection("suppliers", now, text_ids("supplier", suppliers())),
        collection("demands", now, numeric_ids(demands())),
        collection("offers", now, numeric_ids(offers())),
        collection("kyc", now, text_ids("kyc", kyc())),
        collection("designations", now, numeric_ids(designations())),
        collection("blogs", now, numeric_ids(blogs())),
        collection("sliders", now, numeric_ids(sliders())),
        collection("price-lists", now, numeric_ids(price_lists())),
        collection("auto-messages", now, numeric_ids(auto_messages())),
        collection("employees", now, text_ids("emp", employees())),
        collection("tasks", now, numeric_ids(tasks())),
    ]
}

fn collection(name: &str, now: u64, rows: Vec<(RowId, Value)>) -> (String, Vec<Record>) {
    let records = rows
        .into_iter()
        .map(|(id, payload)| Record::new(id, payload, now))
        .collect();
    (name.to_string(), records)
}

fn numeric_ids(payloads: Vec<Value>) -> Vec<(RowId, Value)> {
    payloads
        .into_iter()
        .enumerate()
        .map(|(i, payload)| (RowId::from(i as i64 + 1), payload))
        .collect()
}

fn text_ids(prefix: &str, payloads: Vec<Value>) -> Vec<(RowId, Value)> {
    payloads
        .into_iter()
        .enumerate()
        .map(|(i, payload)| (RowId::from(format!("{}-{}", prefix, i + 1)), payload))
        .collect()
}

fn buyers() -> Vec<Value> {
    vec![
        json!({"company": "Shree Exports", "contactName": "Anil Mehta", "email": "anil@shreeexports.in", "city": "Ahmedabad", "status": "active"}),
        json!({"company": "Apex Fabricators", "contactName": "Priya Nair", "email": "priya@apexfab.com", "city": "Pune", "status": "active"}),
        json!({"company": "Kerala Latex Co", "contactName": "Joseph Varghese", "email": "joseph@keralalatex.in", "city": "Kochi", "status": "inactive"}),
        json!({"company": "Metro Metals", "contactName": "Rahul Gupta", "email": "rahul@metrometals.in", "city": "Delhi", "status": "active"}),
    ]
}

fn suppliers() -> Vec<Value> {
    vec![
        json!({"company": "Birla Copper Works", "contactName": "Sunita Rao", "category": "metals", "rating": 4.6, "status": "active"}),
        json!({"company": "Sunrise Plastics", "contactName": "Vikram Shah", "category": "polymers", "rating": 3.9, "status": "active"}),
        json!({"company": "Deccan Agro Traders", "contactName": "Meera Iyer", "category": "agro", "rating": null, "status": "inactive"}),
    ]
}

fn demands() -> Vec<Value> {
    vec![
        json!({"product": "Industrial Machinery Parts", "buyer": "Shree Exports", "category": "machinery", "quantity": 40, "postedAt": "2024-02-01", "status": "approved"}),
        json!({"product": "Copper Cathodes", "buyer": "Metro Metals", "category": "metals", "quantity": 12, "postedAt": "2024-02-03", "status": "pending"}),
        json!({"product": "Stainless Steel Sheets, Grade 304", "buyer": "Apex Fabricators", "category": "metals", "quantity": 250, "postedAt": "2024-01-20", "status": "approved"}),
        json!({"product": "Polypropylene Granules", "buyer": "Sunrise Plastics", "category": "polymers", "quantity": 90, "postedAt": "2024-02-10", "status": "rejected"}),
        json!({"product": "Natural Rubber", "buyer": "Kerala Latex Co", "category": "agro", "quantity": 500, "postedAt": "2024-01-05", "status": "approved"}),
        json!({"product": "Aluminium Ingots", "buyer": "Metro Metals", "category": "metals", "quantity": 75, "postedAt": "2024-02-12", "status": "pending"}),
    ]
}

fn offers() -> Vec<Value> {
    vec![
        json!({"product": "Copper Wire Rods", "supplier": "Birla Copper Works", "price": 812.5, "validUntil": "2024-06-30", "status": "approved"}),
        json!({"product": "HDPE Pipes", "supplier": "Sunrise Plastics", "price": 145.0, "validUntil": "2024-04-15", "status": "pending"}),
        json!({"product": "Basmati Rice", "supplier": "Deccan Agro Traders", "price": 92.75, "validUntil": null, "status": "rejected"}),
    ]
}

fn kyc() -> Vec<Value> {
    vec![
        json!({"company": "Shree Exports", "documentType": "GST certificate", "gstin": "24AAACS1234F1Z5", "submittedAt": "2024-01-18T09:30:00Z", "status": "approved"}),
        json!({"company": "Metro Metals", "documentType": "PAN card", "gstin": "07AAFCM5678K1Z2", "submittedAt": "2024-02-02T14:05:00Z", "status": "pending"}),
        json!({"company": "Sunrise Plastics", "documentType": "Trade licence", "gstin": null, "submittedAt": "2024-02-09T11:45:00Z", "status": "rejected"}),
    ]
}

fn designations() -> Vec<Value> {
    vec![
        json!({"name": "Sales Manager", "department": "Sales"}),
        json!({"name": "HR Executive", "department": "HR"}),
        json!({"name": "Accountant", "department": "Finance"}),
        json!({"name": "Store Keeper", "department": "Operations"}),
    ]
}

fn blogs() -> Vec<Value> {
    vec![
        json!({"title": "Monsoon freight rates explained", "author": "Editorial", "tags": ["logistics", "freight"], "publishedAt": "2024-01-25", "status": "published"}),
        json!({"title": "How to pass KYC on the first try", "author": "Compliance", "tags": ["kyc"], "publishedAt": null, "status": "draft"}),
    ]
}

fn sliders() -> Vec<Value> {
    vec![
        json!({"title": "Spring metals fair", "order": 1, "imageUrl": "/images/sliders/metals-fair.jpg", "status": "active"}),
        json!({"title": "Verified suppliers", "order": 2, "imageUrl": "/images/sliders/verified.jpg", "status": "inactive"}),
    ]
}

fn price_lists() -> Vec<Value> {
    vec![
        json!({"product": "Copper Cathode", "category": "metals", "price": 8120.0, "unit": "tonne"}),
        json!({"product": "Natural Rubber RSS4", "category": "agro", "price": 182.5, "unit": "kg"}),
        json!({"product": "PP Homopolymer", "category": "polymers", "price": 104.0, "unit": "kg"}),
    ]
}

fn auto_messages() -> Vec<Value> {
    vec![
        json!({"name": "Welcome buyer", "trigger": "buyer.registered", "template": "Welcome to the marketplace, {{name}}!", "channel": "email", "status": "active"}),
        json!({"name": "KYC approved", "trigger": "kyc.approved", "template": "Your KYC has been approved.", "channel": "sms", "status": "active"}),
        json!({"name": "Offer expiring", "trigger": "offer.expiring", "template": "Your offer {{product}} expires soon.", "channel": "whatsapp", "status": "inactive"}),
    ]
}

fn employees() -> Vec<Value> {
    vec![
        json!({"name": "Asha Kulkarni", "email": "asha@backoffice.local", "designation": "Sales Manager", "joinedAt": "2021-07-01", "status": "active"}),
        json!({"name": "Ravi Menon", "email": "ravi@backoffice.local", "designation": "Accountant", "joinedAt": "2022-03-14", "status": "active"}),
        json!({"name": "Meena Das", "email": "meena@backoffice.local", "designation": "HR Executive", "joinedAt": "2020-11-09", "status": "inactive"}),
    ]
}

fn tasks() -> Vec<Value> {
    vec![
        json!({"title": "Verify pending KYC documents", "assignee": "Asha Kulkarni", "dueDate": "2024-02-20", "priority": 1, "status": "todo"}),
        json!({"title": "Update copper price list", "assignee": "Ravi Menon", "dueDate": "2024-02-15", "priority": 2, "status": "in-progress"}),
        json!({"title": "Archive rejected demands", "assignee": null, "dueDate": null, "priority": 3, "status": "done"}),
    ]
}
