use actix_web::{web, HttpResponse, Responder};
use futures::TryStreamExt;
use mongodb::{bson::doc, Client};
use std::sync::Arc;

use crate::db::mongo;
use crate::models::room::Room;

pub async fn get_rooms(data: web::Data<Arc<Client>>) -> impl Responder {
    let client = data.into_inner();
    let collection = mongo::rooms(&client);

    match collection.find(doc! {}).await {
        Ok(cursor) => match cursor.try_collect::<Vec<Room>>().await {
            Ok(rooms) => HttpResponse::Ok().json(rooms),
            Err(err) => {
                eprintln!("Error collecting rooms: {:?}", err);
                HttpResponse::InternalServerError().body("Failed to retrieve rooms")
            }
        },
        Err(err) => {
            eprintln!("Error fetching rooms: {:?}", err);
            HttpResponse::InternalServerError().body("Failed to fetch rooms")
        }
    }
}

pub async fn get_room_by_id(
    data: web::Data<Arc<Client>>,
    path: web::Path<String>,
) -> impl Responder {
    let client = data.into_inner();
    let room_id = path.into_inner();

    match mongo::rooms(&client).find_one(doc! { "_id": &room_id }).await {
        Ok(Some(room)) => HttpResponse::Ok().json(room),
        Ok(None) => HttpResponse::NotFound().body("Room not found"),
        Err(err) => {
            eprintln!("Error fetching room {}: {:?}", room_id, err);
            HttpResponse::InternalServerError().body("Failed to fetch room")
        }
    }
}
